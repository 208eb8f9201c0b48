// Copyright 2018 Chris Pearce
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Set operations over sorted, duplicate free slices.

pub fn union<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: PartialOrd + Copy,
{
    let mut c: Vec<T> = Vec::with_capacity(a.len() + b.len());
    let mut ap = 0;
    let mut bp = 0;
    while ap < a.len() && bp < b.len() {
        if a[ap] < b[bp] {
            c.push(a[ap]);
            ap += 1;
        } else if b[bp] < a[ap] {
            c.push(b[bp]);
            bp += 1;
        } else {
            c.push(a[ap]);
            ap += 1;
            bp += 1;
        }
    }
    c.extend_from_slice(&a[ap..]);
    c.extend_from_slice(&b[bp..]);
    c
}

pub fn intersection<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: PartialOrd + Copy,
{
    let mut c: Vec<T> = Vec::with_capacity(a.len().min(b.len()));
    let mut ap = 0;
    let mut bp = 0;
    while ap < a.len() && bp < b.len() {
        if a[ap] < b[bp] {
            ap += 1;
        } else if b[bp] < a[ap] {
            bp += 1;
        } else {
            c.push(a[ap]);
            ap += 1;
            bp += 1;
        }
    }
    c
}

// Returns a with the items of b removed. Every item of b must be in a.
pub fn split_out<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: PartialOrd + Copy,
{
    let mut c: Vec<T> = Vec::with_capacity(a.len());
    let mut ap = 0;
    let mut bp = 0;
    while ap < a.len() && bp < b.len() {
        if a[ap] < b[bp] {
            c.push(a[ap]);
            ap += 1;
        } else if b[bp] < a[ap] {
            panic!("Tried to remove item that's not in set!");
        } else {
            ap += 1;
            bp += 1;
        }
    }
    c.extend_from_slice(&a[ap..]);
    c
}

#[cfg(test)]
mod tests {
    use crate::item::Item;
    fn to_item_vec(nums: &[u32]) -> Vec<Item> {
        nums.iter().map(|i| Item::with_id(*i)).collect()
    }

    #[test]
    fn test_union() {
        use super::union;

        let test_cases: Vec<(Vec<Item>, Vec<Item>, Vec<Item>)> = [
            (vec![1, 2, 3], vec![4, 5, 6], vec![1, 2, 3, 4, 5, 6]),
            (vec![1, 2, 3], vec![3, 4, 5, 6], vec![1, 2, 3, 4, 5, 6]),
            (vec![2, 4], vec![1, 3], vec![1, 2, 3, 4]),
            (vec![], vec![1], vec![1]),
            (vec![1], vec![], vec![1]),
        ]
        .iter()
        .map(|(a, b, u)| (to_item_vec(a), to_item_vec(b), to_item_vec(u)))
        .collect();

        for (a, b, c) in &test_cases {
            assert_eq!(&union(a, b), c);
        }
    }

    #[test]
    fn test_intersection() {
        use super::intersection;

        let test_cases: Vec<(Vec<Item>, Vec<Item>, Vec<Item>)> = [
            (vec![1, 2, 3], vec![4, 5, 6], vec![]),
            (vec![1, 2, 3], vec![2, 3, 4], vec![2, 3]),
            (vec![1, 5], vec![1, 2, 3, 4, 5], vec![1, 5]),
            (vec![], vec![1], vec![]),
        ]
        .iter()
        .map(|(a, b, i)| (to_item_vec(a), to_item_vec(b), to_item_vec(i)))
        .collect();

        for (a, b, c) in &test_cases {
            assert_eq!(&intersection(a, b), c);
            assert_eq!(&intersection(b, a), c);
        }
    }

    #[test]
    fn test_split_out() {
        use super::split_out;

        let test_cases: Vec<(Vec<Item>, Vec<Item>, Vec<Item>)> = [
            (vec![1, 2, 3], vec![1], vec![2, 3]),
            (vec![1, 2, 3], vec![2], vec![1, 3]),
            (vec![1, 2, 3], vec![1, 3], vec![2]),
            (vec![1, 2, 3], vec![], vec![1, 2, 3]),
        ]
        .iter()
        .map(|(a, b, s)| (to_item_vec(a), to_item_vec(b), to_item_vec(s)))
        .collect();

        for (a, b, c) in &test_cases {
            assert_eq!(&split_out(a, b), c);
        }
    }

    #[test]
    #[should_panic]
    fn test_split_out_missing_item() {
        super::split_out(&to_item_vec(&[1, 2]), &to_item_vec(&[3]));
    }
}
