use log::warn;
use ndarray::{Array, ArrayBase, Axis, Dimension, Slice};

/// An array that can be cut into contiguous pieces along one axis
pub trait AxisSlice: Sized {
    /// Number of splittable axes
    fn ndim(&self) -> usize;

    /// Extent along `axis`
    fn len_of(&self, axis: usize) -> usize;

    /// Owned copy of `len` units along `axis`, starting at `start`
    fn slice_along(&self, axis: usize, start: usize, len: usize) -> Self;
}

impl<A: Clone, D: Dimension> AxisSlice for Array<A, D> {
    fn ndim(&self) -> usize {
        ArrayBase::ndim(self)
    }

    fn len_of(&self, axis: usize) -> usize {
        ArrayBase::len_of(self, Axis(axis))
    }

    fn slice_along(&self, axis: usize, start: usize, len: usize) -> Self {
        self.slice_axis(Axis(axis), Slice::from(start..start + len))
            .to_owned()
    }
}

/// One piece produced by [`AxisSplitter`]
#[derive(Debug, Clone, PartialEq)]
pub struct SplitDescriptor<T> {
    /// Split index in `0..n`
    pub index: usize,

    /// Start of the piece on every axis, `None` without an array
    pub start: Option<Vec<usize>>,

    /// The piece itself, `None` without an array
    pub array: Option<T>,

    /// Whether the start was pushed forward to absorb uneven division
    pub shifted: bool,
}

/// Splits an array into `n` pieces along one axis
///
/// Every piece has `floor(len / n)` units. When the axis length is not
/// divisible by `n`, the last `len % n` pieces start `max(0, i + 1 + rem - n)`
/// units after `i * base`, which leaves single units between some pieces
/// uncovered. Each shifted piece logs a warning.
///
/// Without an array the splitter still yields `n` descriptors, with no start
/// and no piece, so callers can duplicate metadata only.
///
/// # Example
///
/// ```
/// use dicomsplit_core::AxisSplitter;
/// use ndarray::Array2;
///
/// let image = Array2::<u16>::zeros((4, 9));
/// let splitter = AxisSplitter::new(Some(&image), 1, 3);
///
/// let pieces: Vec<_> = splitter.iter().collect();
/// assert_eq!(pieces.len(), 3);
/// assert_eq!(pieces[2].start, Some(vec![0, 6]));
/// assert_eq!(pieces[2].array.as_ref().unwrap().dim(), (4, 3));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AxisSplitter<'a, T> {
    array: Option<&'a T>,
    axis: usize,
    n: usize,
}

impl<'a, T: AxisSlice> AxisSplitter<'a, T> {
    /// Creates a splitter over `array`
    ///
    /// # Panics
    ///
    /// Panics if an array is given and `axis` is not one of its axes.
    pub fn new(array: Option<&'a T>, axis: usize, n: usize) -> Self {
        if let Some(array) = array {
            assert!(
                axis < array.ndim(),
                "axis {} out of range for {} dimensions",
                axis,
                array.ndim()
            );
        }
        Self { array, axis, n }
    }

    /// Axis being split
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Number of pieces
    pub fn n(&self) -> usize {
        self.n
    }

    /// Starts a fresh pass over the pieces
    pub fn iter(&self) -> Splits<'a, T> {
        let (size, remainder) = match (self.array, self.n) {
            (Some(array), n) if n > 0 => {
                let len = array.len_of(self.axis);
                (len / n, len % n)
            }
            _ => (0, 0),
        };
        Splits {
            array: self.array,
            axis: self.axis,
            n: self.n,
            index: 0,
            size,
            remainder,
        }
    }
}

impl<'a, T: AxisSlice> IntoIterator for &AxisSplitter<'a, T> {
    type Item = SplitDescriptor<T>;
    type IntoIter = Splits<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the pieces of an [`AxisSplitter`]
#[derive(Debug)]
pub struct Splits<'a, T> {
    array: Option<&'a T>,
    axis: usize,
    n: usize,
    index: usize,
    size: usize,
    remainder: usize,
}

impl<'a, T: AxisSlice> Splits<'a, T> {
    fn offset(&self, index: usize) -> usize {
        (index + 1 + self.remainder).saturating_sub(self.n)
    }
}

impl<'a, T: AxisSlice> Iterator for Splits<'a, T> {
    type Item = SplitDescriptor<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.n {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let Some(array) = self.array else {
            return Some(SplitDescriptor {
                index,
                start: None,
                array: None,
                shifted: false,
            });
        };

        let offset = self.offset(index);
        if offset > 0 {
            warn!(
                "image axis {} not divisible by {}, split {} offset 1 pixel from previous split",
                self.axis,
                self.n,
                index + 1
            );
        }

        let mut start = vec![0; array.ndim()];
        start[self.axis] = index * self.size + offset;
        let piece = array.slice_along(self.axis, start[self.axis], self.size);

        Some(SplitDescriptor {
            index,
            start: Some(start),
            array: Some(piece),
            shifted: offset > 0,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.n - self.index.min(self.n);
        (remaining, Some(remaining))
    }
}

impl<'a, T: AxisSlice> ExactSizeIterator for Splits<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{concatenate, Array1, Array2, Array3};
    use rstest::rstest;

    #[test]
    fn test_concatenated_blocks_split_back() {
        let blocks: Vec<Array2<f64>> = (0..3)
            .map(|i| Array2::<f64>::zeros((3, 3)) + i as f64)
            .collect();
        let views: Vec<_> = blocks.iter().map(|block| block.view()).collect();
        let stacked = concatenate(Axis(0), &views).unwrap();

        let splitter = AxisSplitter::new(Some(&stacked), 0, blocks.len());
        let mut count = 0;
        for piece in &splitter {
            assert_eq!(piece.array.as_ref(), Some(&blocks[piece.index]));
            assert_eq!(piece.start, Some(vec![piece.index * 3, 0]));
            assert!(!piece.shifted);
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[rstest]
    #[case(9, 3)]
    #[case(10, 3)]
    #[case(10, 4)]
    #[case(7, 7)]
    #[case(5, 1)]
    #[case(2, 5)]
    fn test_piece_count_and_length(#[case] len: usize, #[case] n: usize) {
        let array = Array1::from_iter(0..len as u32);
        let pieces: Vec<_> = AxisSplitter::new(Some(&array), 0, n).iter().collect();

        assert_eq!(pieces.len(), n);
        let mut previous = 0;
        for (i, piece) in pieces.iter().enumerate() {
            assert_eq!(piece.index, i);
            let start = piece.start.as_ref().unwrap()[0];
            assert!(start >= previous);
            previous = start;
            assert_eq!(piece.array.as_ref().unwrap().len(), len / n);
        }
    }

    #[test]
    fn test_uneven_division_shifts_last_pieces() {
        let array = Array1::from_iter(0..10u32);
        let pieces: Vec<_> = AxisSplitter::new(Some(&array), 0, 4).iter().collect();

        let starts: Vec<_> = pieces.iter().map(|p| p.start.as_ref().unwrap()[0]).collect();
        assert_eq!(starts, vec![0, 2, 5, 8]);
        let shifted: Vec<_> = pieces.iter().map(|p| p.shifted).collect();
        assert_eq!(shifted, vec![false, false, true, true]);
        assert_eq!(
            pieces[2].array.as_ref().unwrap().to_vec(),
            vec![5, 6]
        );
        assert_eq!(
            pieces[3].array.as_ref().unwrap().to_vec(),
            vec![8, 9]
        );
    }

    #[test]
    fn test_split_along_columns_of_volume() {
        let volume = Array3::from_shape_fn((2, 3, 7), |(f, r, c)| (f * 100 + r * 10 + c) as i32);
        let pieces: Vec<_> = AxisSplitter::new(Some(&volume), 2, 2).iter().collect();

        assert_eq!(pieces[0].start, Some(vec![0, 0, 0]));
        assert_eq!(pieces[1].start, Some(vec![0, 0, 4]));
        let second = pieces[1].array.as_ref().unwrap();
        assert_eq!(second.dim(), (2, 3, 3));
        assert_eq!(second[[1, 2, 0]], 124);
    }

    #[test]
    fn test_without_array_yields_empty_descriptors() {
        let splitter: AxisSplitter<'_, Array2<u8>> = AxisSplitter::new(None, 1, 3);
        let pieces: Vec<_> = splitter.iter().collect();

        assert_eq!(pieces.len(), 3);
        for (i, piece) in pieces.iter().enumerate() {
            assert_eq!(piece.index, i);
            assert!(piece.start.is_none());
            assert!(piece.array.is_none());
        }
    }

    #[test]
    fn test_iteration_restarts() {
        let array = Array2::<u8>::zeros((4, 4));
        let splitter = AxisSplitter::new(Some(&array), 1, 2);

        let mut first = splitter.iter();
        assert_eq!(first.len(), 2);
        first.next();
        assert_eq!(first.len(), 1);

        let indices: Vec<_> = splitter.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    #[should_panic(expected = "axis 2 out of range")]
    fn test_axis_out_of_range_panics() {
        let array = Array2::<u8>::zeros((4, 4));
        AxisSplitter::new(Some(&array), 2, 2);
    }
}
