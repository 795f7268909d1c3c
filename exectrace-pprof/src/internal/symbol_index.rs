// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::{Dedup, FxIndexMap, FxIndexSet, Id};
use crate::internal::{Function, FunctionId, Location};
use crate::{Frame, ProfileError};

/// Deduplicates the functions and locations of the stacks that samples
/// refer to. Functions are keyed by (name, file), and locations by program
/// counter. Both iterate in first-encounter order.
#[derive(Debug, Default)]
pub struct SymbolIndex<'a> {
    functions: FxIndexSet<Function<'a>>,
    locations: FxIndexMap<u64, Location>,
}

impl<'a> SymbolIndex<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(functions: usize, locations: usize) -> Result<Self, ProfileError> {
        let mut this = Self::default();
        this.functions.try_reserve(functions)?;
        this.locations.try_reserve(locations)?;
        Ok(this)
    }

    pub fn resolve_function(
        &mut self,
        name: &'a str,
        filename: &'a str,
    ) -> Result<FunctionId, ProfileError> {
        self.functions.try_dedup(Function { name, filename })
    }

    /// Records the location of the frame's PC, returning true if the PC was
    /// already known. The first frame seen for a PC decides its function and
    /// line; later frames with the same PC don't change them.
    pub fn resolve_location(&mut self, frame: &'a Frame) -> Result<bool, ProfileError> {
        if self.locations.contains_key(&frame.pc) {
            return Ok(true);
        }
        let function_id = self.resolve_function(&frame.function, &frame.file)?;
        self.locations.try_reserve(1)?;
        self.locations.insert(
            frame.pc,
            Location {
                function_id,
                line: frame.line,
            },
        );
        Ok(false)
    }

    /// Indexes every frame of a stack, in the order given.
    pub fn index_stack(&mut self, frames: &'a [Frame]) -> Result<(), ProfileError> {
        for frame in frames {
            self.resolve_function(&frame.function, &frame.file)?;
            self.resolve_location(frame)?;
        }
        Ok(())
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function<'a>)> {
        self.functions
            .iter()
            .enumerate()
            .filter_map(|(offset, function)| Some((FunctionId::from_offset(offset)?, function)))
    }

    /// Iterates the locations with their program counters.
    pub fn locations(&self) -> impl Iterator<Item = (u64, &Location)> {
        self.locations.iter().map(|(pc, location)| (*pc, location))
    }

    #[cfg(test)]
    pub fn location(&self, pc: u64) -> Option<&Location> {
        self.locations.get(&pc)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn functions_dedup_on_name_and_file() {
        let mut index = SymbolIndex::new();
        let f = index.resolve_function("f", "a.go").unwrap();
        let g = index.resolve_function("g", "a.go").unwrap();
        let f_elsewhere = index.resolve_function("f", "b.go").unwrap();
        assert_eq!(1, f.to_raw_id());
        assert_eq!(2, g.to_raw_id());
        assert_eq!(3, f_elsewhere.to_raw_id());
        assert_eq!(f, index.resolve_function("f", "a.go").unwrap());
        assert_eq!(3, index.function_count());
    }

    #[test]
    fn first_frame_for_a_pc_wins() {
        let first = Frame::new(100, "f", "a.go", 5);
        let second = Frame::new(100, "g", "b.go", 9);
        let mut index = SymbolIndex::new();
        assert!(!index.resolve_location(&first).unwrap());
        assert!(index.resolve_location(&second).unwrap());

        let location = index.location(100).unwrap();
        assert_eq!(5, location.line);
        assert_eq!(1, location.function_id.to_raw_id());
        assert_eq!(1, index.location_count());
        assert_eq!(1, index.function_count());
    }

    #[test]
    fn indexing_a_stack_keeps_frame_order() {
        let stack = vec![
            Frame::new(0x30, "runtime.main", "proc.go", 250),
            Frame::new(0x20, "main.main", "main.go", 10),
            Frame::new(0x10, "main.work", "main.go", 20),
            Frame::new(0x20, "main.main", "main.go", 10),
        ];
        let mut index = SymbolIndex::new();
        index.index_stack(&stack).unwrap();

        let pcs: Vec<u64> = index.locations().map(|(pc, _)| pc).collect();
        assert_eq!(vec![0x30, 0x20, 0x10], pcs);
        let names: Vec<(u64, &str)> = index
            .functions()
            .map(|(id, f)| (id.to_raw_id(), f.name))
            .collect();
        assert_eq!(
            vec![(1, "runtime.main"), (2, "main.main"), (3, "main.work")],
            names
        );
        let work = index.location(0x10).unwrap();
        assert_eq!(3, work.function_id.to_raw_id());
    }

    #[test]
    fn shared_pc_still_registers_its_function() {
        let a = vec![Frame::new(100, "f", "a.go", 5)];
        let b = vec![Frame::new(100, "g", "b.go", 9)];
        let mut index = SymbolIndex::new();
        index.index_stack(&a).unwrap();
        index.index_stack(&b).unwrap();
        assert_eq!(2, index.function_count());
        assert_eq!(1, index.location_count());
    }
}
