use std::fmt;

use num_traits::{Float, Zero};

use crate::RCTreeFloat;

/// Bounding box of a collection of points.
///
/// Given a set of *d*-dimensional points, a bounding box is the smallest
/// *d*-dimensional rectangular prism containing all of them, represented by
/// a vector of per-dimension minima and a vector of per-dimension maxima.
///
/// # Examples
///
/// ```
/// use rrctlib::BoundingBox;
///
/// // create a new bounding box from a single point
/// let point: Vec<f32> = vec![1.0, 2.0];
/// let bbox = BoundingBox::new_from_point(&point);
/// assert_eq!(bbox.min_values(), &[1.0, 2.0]);
/// assert_eq!(bbox.max_values(), &[1.0, 2.0]);
///
/// // grow it by merging in another point
/// let merged = BoundingBox::merged_box_with_point(&bbox, &[3.0, -2.0]);
/// println!("{}", &merged);   // BoundingBox ([1.0, -2.0], [3.0, 2.0])
/// assert!(merged.contains_point(&point));
/// assert_eq!(merged.range_sum(), 6.0);
/// ```
pub struct BoundingBox<T> {
    min_values: Vec<T>,
    max_values: Vec<T>,
    dimensions: usize,
    range_sum: T,
}

impl<T> BoundingBox<T> where T: RCTreeFloat {

    /// Create a new bounding box from a min values vector and a max values
    /// vector.
    pub fn new(min_values: &[T], max_values: &[T]) -> Self {
        assert_eq!(min_values.len(), max_values.len());

        BoundingBox {
            min_values: min_values.to_vec(),
            max_values: max_values.to_vec(),
            dimensions: min_values.len(),
            range_sum: BoundingBox::compute_range_sum(min_values, max_values),
        }
    }

    /// Create a new bounding box from a single point.
    ///
    /// The resulting bounding box has no interior: its min values are equal
    /// to its max values and its range sum is zero.
    pub fn new_from_point(point: &[T]) -> Self {
        BoundingBox {
            min_values: point.to_vec(),
            max_values: point.to_vec(),
            dimensions: point.len(),
            range_sum: Zero::zero(),
        }
    }

    /// Returns a new bounding box given by merging a bounding box with a
    /// point.
    ///
    /// If the point lies inside the bounding box then this returns a copy of
    /// the same bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrctlib::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(&[0.0, 0.0], &[1.0, 1.0]);
    /// let merged = BoundingBox::merged_box_with_point(&bbox, &[0.5, 3.0]);
    /// assert_eq!(merged.max_values(), &[1.0, 3.0]);
    /// assert_eq!(merged.range_sum(), 4.0);
    /// ```
    pub fn merged_box_with_point(bounding_box: &BoundingBox<T>, point: &[T]) -> Self {
        let min_values: Vec<T> = bounding_box.min_values().iter()
            .zip(point)
            .map(|(&x, &y)| Float::min(x, y))
            .collect();

        let max_values: Vec<T> = bounding_box.max_values().iter()
            .zip(point)
            .map(|(&x, &y)| Float::max(x, y))
            .collect();

        BoundingBox::new(&min_values, &max_values)
    }

    /// Get the dimensionality of the bounding box.
    pub fn dimensions(&self) -> usize { self.dimensions }

    /// Get the vector of min values of the bounding box.
    pub fn min_values(&self) -> &[T] { &self.min_values }

    /// Get the vector of max values of the bounding box.
    pub fn max_values(&self) -> &[T] { &self.max_values }

    /// Get the sum across all dimensions of the side lengths of the bounding
    /// box.
    pub fn range_sum(&self) -> T { self.range_sum }

    /// Returns true if the given point is contained inside the bounding box.
    pub fn contains_point(&self, point: &[T]) -> bool {
        for i in 0..self.dimensions {
            if point[i] < self.min_values[i] || self.max_values[i] < point[i] {
                return false;
            }
        }
        true
    }

    /// Compute the range sum from a pair of min/max value vectors.
    ///
    /// The range sum is the sum over all dimensions of the difference between
    /// the max value and the min value. For example, if the min values are
    /// `[a, b]` and the max values are `[c, d]` then the range sum is
    /// `(c - a) + (d - b)`.
    pub fn compute_range_sum(min_values: &[T], max_values: &[T]) -> T {
        let dimensions = min_values.len();
        assert_eq!(dimensions, max_values.len());

        (0..dimensions).map(|i| max_values[i] - min_values[i]).sum()
    }
}

impl<T> fmt::Display for BoundingBox<T>
    where T: RCTreeFloat + fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundingBox ({:?}, {:?})", self.min_values, self.max_values)
    }
}
