use std::fmt;

use ndarray::{s, Array2};

use crate::env::BLANK;
use crate::error::AgentError;

/// Hashable fingerprint of a cropped character grid, used only as a table key.
///
/// The first four bytes hold the grid's row and column counts (little-endian
/// `u16`), the rest are the cells in row-major order.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State(Box<[u8]>);

impl State {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State")
            .field(&String::from_utf8_lossy(&self.0[4.min(self.0.len())..]))
            .finish()
    }
}

/// Crops away the blank border around the visible cells of `chars`.
pub fn crop(chars: &Array2<u8>) -> Result<Array2<u8>, AgentError> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for ((row, col), &c) in chars.indexed_iter() {
        if c == BLANK {
            continue;
        }
        bounds = Some(match bounds {
            None => (row, row, col, col),
            Some((r0, r1, c0, c1)) => (r0.min(row), r1.max(row), c0.min(col), c1.max(col)),
        });
    }
    let (r0, r1, c0, c1) = bounds.ok_or(AgentError::EmptyObservation)?;
    Ok(chars.slice(s![r0..=r1, c0..=c1]).to_owned())
}

/// Serializes an already cropped grid into its [`State`] fingerprint.
pub fn fingerprint(chars: &Array2<u8>) -> Result<State, AgentError> {
    let (nrow, ncol) = chars.dim();
    let too_large = |_| AgentError::ObservationTooLarge { nrow, ncol };
    let rows: u16 = u16::try_from(nrow).map_err(too_large)?;
    let cols: u16 = u16::try_from(ncol).map_err(too_large)?;
    let mut bytes: Vec<u8> = Vec::with_capacity(4 + nrow * ncol);
    bytes.extend_from_slice(&rows.to_le_bytes());
    bytes.extend_from_slice(&cols.to_le_bytes());
    bytes.extend(chars.iter());
    Ok(State(bytes.into_boxed_slice()))
}

/// Crops `chars` and fingerprints the result.
pub fn hashable(chars: &Array2<u8>) -> Result<(Array2<u8>, State), AgentError> {
    let cropped: Array2<u8> = crop(chars)?;
    let state: State = fingerprint(&cropped)?;
    Ok((cropped, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn crop_removes_blank_border() {
        let chars = array![
            [b' ', b' ', b' ', b' '],
            [b' ', b'@', b'.', b' '],
            [b' ', b'.', b'>', b' '],
            [b' ', b' ', b' ', b' '],
        ];
        let cropped = crop(&chars).unwrap();
        assert_eq!(cropped, array![[b'@', b'.'], [b'.', b'>']]);
    }

    #[test]
    fn crop_of_blank_grid_fails() {
        let chars = Array2::from_elem((3, 3), BLANK);
        assert_eq!(crop(&chars).unwrap_err(), AgentError::EmptyObservation);
    }

    #[test]
    fn same_content_same_state() {
        let a = array![[b' ', b'@', b'.'], [b' ', b' ', b' ']];
        let b = array![[b'@', b'.', b' '], [b' ', b' ', b' ']];
        assert_eq!(hashable(&a).unwrap().1, hashable(&b).unwrap().1);
    }

    #[test]
    fn shape_is_part_of_the_fingerprint() {
        let wide = array![[b'.', b'.', b'.', b'.', b'.', b'.']];
        let tall = array![[b'.', b'.', b'.'], [b'.', b'.', b'.']];
        assert_ne!(fingerprint(&wide).unwrap(), fingerprint(&tall).unwrap());
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let chars = Array2::from_elem((1, 70_000), b'.');
        assert_eq!(
            fingerprint(&chars),
            Err(AgentError::ObservationTooLarge {
                nrow: 1,
                ncol: 70_000
            })
        );
        assert!(fingerprint(&Array2::from_elem((1, 65_535), b'.')).is_ok());
    }
}
