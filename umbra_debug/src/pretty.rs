// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use umbra_core::classify::{Classification, LeafReason};
use umbra_core::observe::{ControllerState, SourceKind};
use umbra_core::trace::{
    ChangeEvent, NodeVisitEvent, PassBeginEvent, PassSummary, SubscriptionEvent, TraceSink,
    TransitionEvent, VisitOutcome,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    visits: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("visits", &self.visits)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            visits: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            visits: false,
        }
    }

    /// Also prints one line per visited node. Off by default; large trees
    /// produce a lot of output.
    #[must_use]
    pub fn with_visits(mut self, visits: bool) -> Self {
        self.visits = visits;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn state_name(state: ControllerState) -> &'static str {
    match state {
        ControllerState::Inactive => "inactive",
        ControllerState::Active => "active",
    }
}

fn source_name(source: SourceKind) -> &'static str {
    match source {
        SourceKind::Resize => "resize",
        SourceKind::Mutation => "mutation",
    }
}

fn outcome_name(outcome: VisitOutcome) -> &'static str {
    match outcome {
        VisitOutcome::DisplayNone => "display-none",
        VisitOutcome::ZeroSize => "zero-size",
        VisitOutcome::Classified(Classification::Container) => "container",
        VisitOutcome::Classified(Classification::Passthrough) => "pass-through",
        VisitOutcome::Classified(Classification::Leaf(reason)) => match reason {
            LeafReason::Media => "leaf:media",
            LeafReason::Heading => "leaf:heading",
            LeafReason::Control => "leaf:control",
            LeafReason::Paragraph => "leaf:paragraph",
            LeafReason::DirectText => "leaf:text",
        },
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} enabled={} container={}",
            e.pass, e.enabled, e.has_container,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[pass] pass={} visited={} emitted={} pruned={} zero_size={} containers={}",
            s.pass, s.visited, s.emitted, s.pruned, s.zero_size, s.containers,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[state] {} -> {}",
            state_name(e.from),
            state_name(e.to),
        );
    }

    fn on_subscription(&mut self, e: &SubscriptionEvent) {
        let verb = if e.subscribed { "subscribe" } else { "release" };
        let _ = writeln!(self.writer, "[{verb}] {}", source_name(e.source));
    }

    fn on_change(&mut self, e: &ChangeEvent) {
        let _ = writeln!(self.writer, "[change] {}", source_name(e.source));
    }

    fn on_node_visit(&mut self, e: &NodeVisitEvent) {
        if !self.visits {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[visit] pass={} depth={} {}",
            e.pass,
            e.depth,
            outcome_name(e.outcome),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_pass_summary(&PassSummary {
            pass: 2,
            visited: 7,
            emitted: 3,
            ..PassSummary::default()
        });
        let output = output(sink);
        assert!(output.starts_with("[pass]"), "got: {output}");
        assert!(output.contains("pass=2 visited=7 emitted=3"), "got: {output}");
    }

    #[test]
    fn pretty_print_lifecycle() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_transition(&TransitionEvent {
            from: ControllerState::Inactive,
            to: ControllerState::Active,
        });
        sink.on_subscription(&SubscriptionEvent {
            source: SourceKind::Mutation,
            subscribed: false,
        });
        sink.on_change(&ChangeEvent {
            source: SourceKind::Resize,
        });
        assert_eq!(
            output(sink),
            "[state] inactive -> active\n[release] mutation\n[change] resize\n"
        );
    }

    #[test]
    fn visits_are_opt_in() {
        let visit = NodeVisitEvent {
            pass: 0,
            depth: 1,
            outcome: VisitOutcome::Classified(Classification::Leaf(LeafReason::Heading)),
        };

        let mut quiet = PrettyPrintSink::with_writer(Vec::<u8>::new());
        quiet.on_node_visit(&visit);
        assert!(output(quiet).is_empty());

        let mut loud = PrettyPrintSink::with_writer(Vec::<u8>::new()).with_visits(true);
        loud.on_node_visit(&visit);
        assert_eq!(output(loud), "[visit] pass=0 depth=1 leaf:heading\n");
    }
}
