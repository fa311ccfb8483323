use num_traits::{Float, Zero};

use rand::distributions::Uniform;

use crate::errors::{RCTreeError, Result};
use crate::tree::BoundingBox;
use crate::RCTreeFloat;

/// Hyperplane cut inside a bounding box.
///
/// A cut is an axis-aligned hyperplane partitioning a point set into two
/// halves. It consists of a `dimension`, the zero-based axis the cut is
/// normal to, and a `value`, the location of the cut along that axis. Points
/// whose coordinate in the cut dimension is less than or equal to the value
/// fall on the left side; all others fall on the right.
///
/// # Examples
///
/// ```
/// use rrctlib::{BoundingBox, Cut};
///
/// let cut = Cut::new(1, 0.0);
/// assert!(Cut::is_left_of(&[1.0, -1.0], &cut));
/// assert!(!Cut::is_left_of(&[1.0, 2.0], &cut));
///
/// // generate a random cut inside a bounding box
/// let bbox = BoundingBox::new(&[0.0, 0.0, 0.0], &[2.0, 3.0, 4.0]);
/// let mut rng = rand::thread_rng();
/// let random_cut = Cut::new_random_cut(&bbox, &mut rng).unwrap();
///
/// assert!(random_cut.dimension() <= 2);
/// assert!(bbox.min_values()[random_cut.dimension()] <= random_cut.value());
/// assert!(random_cut.value() <= bbox.max_values()[random_cut.dimension()]);
/// ```
#[derive(Debug)]
pub struct Cut<T> {
    dimension: usize,
    value: T,
}

impl<T> Cut<T>
    where T: RCTreeFloat
{

    /// Create a new cut from a given dimension and value.
    pub fn new(dimension: usize, value: T) -> Self {
        Cut { dimension, value }
    }

    /// Returns a random cut inside a bounding box.
    ///
    /// A single uniform draw over the box's total range selects both the cut
    /// dimension, with probability proportional to the box's extent along
    /// each axis, and the cut value, uniformly within the selected extent.
    /// Axes the box is flat in carry no probability mass. A cut that lands
    /// exactly on the upper face of the box is nudged one epsilon inward so
    /// that both sides of the cut are non-empty.
    ///
    /// Returns [`RCTreeError::InvariantViolation`] if the walk over the
    /// per-dimension ranges fails to place the draw, which floating point
    /// accumulation should never allow to happen.
    pub fn new_random_cut<R: rand::Rng>(
        bounding_box: &BoundingBox<T>,
        rng: &mut R,
    ) -> Result<Self> {
        let distribution = Uniform::new(0.0, 1.0);
        let random: f64 = rng.sample(distribution);

        let min = bounding_box.min_values();
        let max = bounding_box.max_values();
        let mut break_point: T = T::from(random).unwrap() * bounding_box.range_sum();

        for i in 0..bounding_box.dimensions() {
            let range = max[i] - min[i];
            if break_point <= range {
                let mut cut_value = min[i] + break_point;
                if cut_value == max[i] && range > Zero::zero() {
                    cut_value = cut_value - Float::epsilon();
                }
                return Ok(Cut::new(i, cut_value));
            }
            break_point = break_point - range;
        }

        Err(RCTreeError::InvariantViolation {
            msg: "the random cut break point did not lie in the bounding box range",
        })
    }

    /// Returns true if `point` is to the left of `cut`.
    ///
    /// This simply checks if the component of the point in the cut's
    /// dimension is less than or equal to the cut's value.
    pub fn is_left_of(point: &[T], cut: &Cut<T>) -> bool {
        point[cut.dimension] <= cut.value
    }

    /// Get the dimension of the cut.
    pub fn dimension(&self) -> usize { self.dimension }

    /// Get the value of the cut.
    pub fn value(&self) -> T { self.value }
}
