// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A lazy k-way merge that repeatedly yields the best head across generators.

use std::iter::Peekable;

/// A boxed node generator with the lifetime of the borrowed book.
pub(crate) type Generator<'a, T> = Box<dyn Iterator<Item = T> + 'a>;

/// Merges `generators` by repeatedly yielding the best head, judged by `better`.
///
/// Nothing is materialized; each generator is only advanced when its head wins. Ties
/// go to the earliest generator in the list.
pub(crate) fn merge_best<'a, T: Clone + 'a>(
    generators: Vec<Generator<'a, T>>,
    better: impl Fn(&T, &T) -> bool + 'a,
) -> impl Iterator<Item = T> + 'a {
    MergeBest {
        generators: generators.into_iter().map(Iterator::peekable).collect(),
        better,
    }
}

struct MergeBest<'a, T, F> {
    generators: Vec<Peekable<Generator<'a, T>>>,
    better: F,
}

impl<'a, T: Clone + 'a, F: Fn(&T, &T) -> bool> Iterator for MergeBest<'a, T, F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut best_index: Option<usize> = None;
        let mut best_value: Option<T> = None;

        for index in 0..self.generators.len() {
            if let Some(candidate) = self.generators[index].peek() {
                let wins = match &best_value {
                    None => true,
                    Some(best) => (self.better)(candidate, best),
                };
                if wins {
                    best_index = Some(index);
                    best_value = Some(candidate.clone());
                }
            }
        }

        self.generators[best_index?].next()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn boxed(values: Vec<i64>) -> Generator<'static, i64> {
        Box::new(values.into_iter())
    }

    #[rstest]
    fn test_merge_ascending() {
        let merged: Vec<i64> = merge_best(
            vec![boxed(vec![1, 4, 9]), boxed(vec![2, 3]), boxed(vec![])],
            |a, b| a < b,
        )
        .collect();
        assert_eq!(merged, vec![1, 2, 3, 4, 9]);
    }

    #[rstest]
    fn test_merge_ties_prefer_earlier_generator() {
        let merged: Vec<i64> =
            merge_best(vec![boxed(vec![5]), boxed(vec![5, 6])], |a, b| a < b).collect();
        assert_eq!(merged, vec![5, 5, 6]);
    }

    #[rstest]
    fn test_merge_empty() {
        let merged: Vec<i64> = merge_best(vec![], |a, b| a < b).collect();
        assert!(merged.is_empty());
    }
}
