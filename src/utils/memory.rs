use std::collections::HashSet;
use std::ptr;
use std::sync::Arc;

/// Estimates the bytes held by a structure and everything reachable from it.
///
/// Shared allocations (`Arc`) are counted once per measurement, no matter how
/// many owners point at them.
#[derive(Default)]
pub struct MemoryMeter {
    visited: HashSet<usize>,
}

impl MemoryMeter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn first_visit<T: ?Sized>(&mut self, value: &T) -> bool {
        let addr = ptr::from_ref(value) as *const () as usize;
        self.visited.insert(addr)
    }

    #[inline]
    fn measure<T: MemorySized + ?Sized>(&mut self, value: &T) -> usize {
        value.inline_size() + value.extra_heap_size(self)
    }

    #[inline]
    pub fn measure_root<T: MemorySized + ?Sized>(value: &T) -> usize {
        MemoryMeter::new().measure(value)
    }

    /// Heap bytes owned by a field; the inline part is already counted by the
    /// enclosing value.
    #[inline]
    pub fn measure_field<T: MemorySized + ?Sized>(&mut self, value: &T) -> usize {
        self.measure(value).saturating_sub(value.inline_size())
    }
}

pub trait MemorySized {
    fn inline_size(&self) -> usize {
        std::mem::size_of_val(self)
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        0
    }
}

macro_rules! impl_memory_for_primitives {
    ($($t:ty),* $(,)?) => {
        $(impl MemorySized for $t {})*
    };
}

impl_memory_for_primitives!(u8, u16, u32, u64, usize, i32, i64, f32, f64, bool, char);

impl MemorySized for String {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<String>()
    }

    fn extra_heap_size(&self, _meter: &mut MemoryMeter) -> usize {
        self.capacity()
    }
}

impl<T: MemorySized> MemorySized for Vec<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Vec<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        let spare = (self.capacity() - self.len()) * std::mem::size_of::<T>();
        spare + self.iter().map(|item| meter.measure(item)).sum::<usize>()
    }
}

impl<T: MemorySized> MemorySized for Option<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Option<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        self.as_ref().map_or(0, |value| meter.measure_field(value))
    }
}

impl<T: MemorySized + ?Sized> MemorySized for Box<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Box<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        meter.measure(self.as_ref())
    }
}

impl<T: MemorySized + ?Sized> MemorySized for Arc<T> {
    fn inline_size(&self) -> usize {
        std::mem::size_of::<Arc<T>>()
    }

    fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
        if meter.first_visit(self.as_ref()) {
            meter.measure(self.as_ref())
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        a: Vec<f64>,
        b: Option<Box<u64>>,
    }

    impl MemorySized for Pair {
        fn extra_heap_size(&self, meter: &mut MemoryMeter) -> usize {
            meter.measure_field(&self.a) + meter.measure_field(&self.b)
        }
    }

    #[test]
    fn vec_counts_capacity_of_elements() {
        let mut v: Vec<f64> = Vec::with_capacity(8);
        v.push(1.0);
        let size = MemoryMeter::measure_root(&v);
        assert_eq!(size, size_of::<Vec<f64>>() + 8 * size_of::<f64>());
    }

    #[test]
    fn nested_fields_are_added_once() {
        let pair = Pair {
            a: vec![1.0, 2.0],
            b: Some(Box::new(3)),
        };
        let size = MemoryMeter::measure_root(&pair);
        let expected = size_of::<Pair>() + 2 * size_of::<f64>() + size_of::<u64>();
        assert_eq!(size, expected);
    }

    #[test]
    fn shared_arc_is_counted_once() {
        let shared = Arc::new(String::from("header"));
        let owners = vec![Arc::clone(&shared), Arc::clone(&shared)];
        let size = MemoryMeter::measure_root(&owners);
        let single = size_of::<String>() + shared.capacity();
        assert_eq!(
            size,
            size_of::<Vec<Arc<String>>>() + 2 * size_of::<Arc<String>>() + single
        );
    }
}
