// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::collections::FxIndexMap;
use crate::internal::{Label, LabelSetId, LabelSetRegistry};
use crate::{Event, ParseResult, ProfileError, StackId};
use exectrace_pprof_protobuf::{self as pprof, Record};

/// The key of the only label attached to sample events. The execution
/// tracer doesn't record pprof labels, so the goroutine is all there is.
pub const THREAD_ID_LABEL: &str = "thread_id:";

/// Every CPU sample event counts once.
pub const CPU_SAMPLE_VALUE: i64 = 1;

/// The individual events behind an aggregated sample, as three parallel
/// arrays in event order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Breakdown {
    pub timestamps: Vec<i64>,
    pub values: Vec<i64>,
    pub label_set_ids: Vec<i64>,
}

impl Breakdown {
    fn try_push(
        &mut self,
        timestamp: i64,
        value: i64,
        label_set_id: LabelSetId,
    ) -> Result<(), ProfileError> {
        self.timestamps.try_reserve(1)?;
        self.values.try_reserve(1)?;
        self.label_set_ids.try_reserve(1)?;
        self.timestamps.push(timestamp);
        self.values.push(value);
        self.label_set_ids.push(i64::from(label_set_id));
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn as_pprof(&self) -> pprof::Breakdown<'_> {
        pprof::Breakdown {
            timestamps: Record::from(self.timestamps.as_slice()),
            values: Record::from(self.values.as_slice()),
            label_set_ids: Record::from(self.label_set_ids.as_slice()),
        }
    }
}

/// All the CPU samples taken on one stack.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StackAggregate {
    /// The sum of the breakdown's values.
    pub value: i64,
    pub breakdown: Breakdown,
}

/// Groups the CPU sample events of a trace by stack. Stacks are kept in the
/// order their first sample was seen.
#[derive(Debug, Default)]
pub struct SampleAggregator {
    aggregates: FxIndexMap<StackId, StackAggregate>,
    label_sets: LabelSetRegistry,
}

impl SampleAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(samples: usize, label_sets: usize) -> Result<Self, ProfileError> {
        let mut aggregates = FxIndexMap::default();
        aggregates.try_reserve(samples)?;
        Ok(Self {
            aggregates,
            label_sets: LabelSetRegistry::with_capacity(label_sets)?,
        })
    }

    /// Adds the event if it's a CPU sample, and ignores it otherwise.
    pub fn add_event(&mut self, event: &Event) -> Result<(), ProfileError> {
        if !event.kind.is_cpu_sample() {
            return Ok(());
        }

        let labels = [Label::new(THREAD_ID_LABEL, event.goroutine.to_string())];
        let label_set_id = self.label_sets.dedup(labels)?;

        self.aggregates.try_reserve(1)?;
        let aggregate = self.aggregates.entry(event.stack_id).or_default();
        aggregate.value = aggregate
            .value
            .checked_add(CPU_SAMPLE_VALUE)
            .ok_or(ProfileError::StorageFull)?;
        aggregate
            .breakdown
            .try_push(event.timestamp, CPU_SAMPLE_VALUE, label_set_id)
    }

    /// Adds every event of the trace, in stream order.
    pub fn aggregate(&mut self, parsed: &ParseResult) -> Result<(), ProfileError> {
        parsed
            .events
            .iter()
            .try_for_each(|event| self.add_event(event))
    }

    pub fn aggregates(&self) -> &FxIndexMap<StackId, StackAggregate> {
        &self.aggregates
    }

    pub fn label_sets(&self) -> &LabelSetRegistry {
        &self.label_sets
    }

    pub fn into_parts(self) -> (FxIndexMap<StackId, StackAggregate>, LabelSetRegistry) {
        (self.aggregates, self.label_sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::Id;
    use crate::EventKind;

    fn sample(goroutine: u64, timestamp: i64, stack_id: StackId) -> Event {
        Event::new(EventKind::CpuSample, goroutine, timestamp, stack_id)
    }

    #[test]
    fn other_events_are_ignored() {
        let mut aggregator = SampleAggregator::new();
        aggregator
            .add_event(&Event::new(EventKind::GoStart, 1, 10, 3))
            .unwrap();
        aggregator
            .add_event(&Event::new(EventKind::Unknown, 1, 11, 3))
            .unwrap();
        assert!(aggregator.aggregates().is_empty());
        assert!(aggregator.label_sets().is_empty());
    }

    #[test]
    fn same_stack_different_goroutines() {
        let mut aggregator = SampleAggregator::new();
        aggregator.add_event(&sample(7, 100, 1)).unwrap();
        aggregator.add_event(&sample(8, 200, 1)).unwrap();

        let aggregate = &aggregator.aggregates()[&1];
        assert_eq!(2, aggregate.value);
        assert_eq!(vec![100, 200], aggregate.breakdown.timestamps);
        assert_eq!(vec![1, 1], aggregate.breakdown.values);
        assert_eq!(vec![0, 1], aggregate.breakdown.label_set_ids);
        assert_eq!(2, aggregator.label_sets().len());
    }

    #[test]
    fn same_stack_same_goroutine_reuses_label_set() {
        let mut aggregator = SampleAggregator::new();
        aggregator.add_event(&sample(7, 100, 1)).unwrap();
        aggregator.add_event(&sample(7, 150, 1)).unwrap();

        let aggregate = &aggregator.aggregates()[&1];
        assert_eq!(vec![0, 0], aggregate.breakdown.label_set_ids);
        assert_eq!(1, aggregator.label_sets().len());
        let (id, set) = aggregator.label_sets().iter().next().unwrap();
        assert_eq!(0, id.to_raw_id());
        assert_eq!(vec![Label::new(THREAD_ID_LABEL, "7")], set.labels());
    }

    #[test]
    fn stacks_keep_first_sample_order() {
        let parsed = ParseResult {
            events: vec![
                sample(1, 30, 9),
                sample(1, 10, 4),
                Event::new(EventKind::GoBlock, 1, 15, 2),
                sample(2, 20, 9),
                sample(1, 5, 6),
            ],
            stacks: Default::default(),
        };
        let mut aggregator = SampleAggregator::new();
        aggregator.aggregate(&parsed).unwrap();

        let stacks: Vec<StackId> = aggregator.aggregates().keys().copied().collect();
        assert_eq!(vec![9, 4, 6], stacks);
        // Event order, even though timestamps go backwards.
        assert_eq!(vec![30, 20], aggregator.aggregates()[&9].breakdown.timestamps);
    }

    #[test]
    fn value_is_sum_of_breakdown() {
        bolero::check!()
            .with_type::<Vec<(u8, i64, u8)>>()
            .for_each(|events| {
                let mut aggregator = SampleAggregator::new();
                for (goroutine, timestamp, stack_id) in events {
                    let event = sample(u64::from(*goroutine), *timestamp, u64::from(*stack_id));
                    aggregator.add_event(&event).unwrap();
                }
                let mut total = 0;
                for aggregate in aggregator.aggregates().values() {
                    let breakdown = &aggregate.breakdown;
                    assert_eq!(breakdown.timestamps.len(), breakdown.values.len());
                    assert_eq!(breakdown.timestamps.len(), breakdown.label_set_ids.len());
                    assert_eq!(aggregate.value, breakdown.values.iter().sum::<i64>());
                    total += breakdown.len();
                }
                assert_eq!(events.len(), total);
            });
    }
}
