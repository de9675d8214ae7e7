//! Array base type used for type identity only.
//!
//! `Array` is the interface for instance checks and type annotations of
//! array values and their traced stand-ins. It carries no behaviour; array
//! construction lives with the concrete types.

use std::any::Any;
use std::fmt::Debug;

/// Marker for array-like values.
pub trait Array: Any + Debug {}

impl dyn Array {
    /// Whether the value is a `T`.
    pub fn is<T: Array>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    pub fn downcast_ref<T: Array>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct DeviceArray(Vec<f32>);
    impl Array for DeviceArray {}

    #[derive(Debug)]
    struct Tracer;
    impl Array for Tracer {}

    fn identity(x: &dyn Array) -> &dyn Array {
        x
    }

    #[test]
    fn test_instance_checks() {
        let concrete = DeviceArray(vec![1.0, 2.0]);
        let value = identity(&concrete);
        assert!(value.is::<DeviceArray>());
        assert!(!value.is::<Tracer>());
        assert_eq!(value.downcast_ref::<DeviceArray>().unwrap().0.len(), 2);
        assert!(identity(&Tracer).is::<Tracer>());
    }
}
