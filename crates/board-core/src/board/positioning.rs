//! Positioning Operations
//!
//! Helpers for keeping positions consistent with array order.

use crate::domain::{Column, ColumnPosition};

/// Next free position after the current maximum (0 when empty)
pub fn next_position<I>(positions: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    positions.into_iter().max().map_or(0, |max| max + 1)
}

/// Reindex columns to be sequential (0, 1, 2, ...) in array order
pub fn renumber(columns: &mut [Column]) {
    for (index, column) in columns.iter_mut().enumerate() {
        column.position = index as u32;
    }
}

/// Absolute `{id, position}` list in array order
pub fn positions_of(columns: &[Column]) -> Vec<ColumnPosition> {
    columns
        .iter()
        .map(|c| ColumnPosition { id: c.id.clone(), position: c.position })
        .collect()
}

/// Remove the element at `from` and reinsert it at `to`
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_position_uses_max_not_count() {
        assert_eq!(next_position(Vec::<u32>::new()), 0);
        assert_eq!(next_position([0, 2]), 3);
        assert_eq!(next_position([5, 1]), 6);
    }

    #[test]
    fn test_array_move_both_directions() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        array_move(&mut v, 0, 2);
        assert_eq!(v, vec!['b', 'c', 'a', 'd']);
        array_move(&mut v, 3, 0);
        assert_eq!(v, vec!['d', 'b', 'c', 'a']);
    }
}
