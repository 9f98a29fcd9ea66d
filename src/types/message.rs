// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scrolling text messages and their optional graph overlay.

use crate::error::ValueError;

/// A sequence of integer samples drawn as a graph under a message.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::types::Graph;
///
/// // JSON array and comma-separated input are both accepted
/// assert_eq!(Graph::parse("[1, 2, 3]").unwrap(), Graph::new(vec![1, 2, 3]));
/// assert_eq!(Graph::parse("1, 2,3").unwrap().to_csv(), "1,2,3");
/// assert!(Graph::parse("1,a").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Graph(Vec<i64>);

impl Graph {
    /// Creates a graph from samples.
    #[must_use]
    pub fn new(samples: Vec<i64>) -> Self {
        Self(samples)
    }

    /// Parses a graph from user input.
    ///
    /// Tries a JSON array of integers first and falls back to a
    /// comma-separated list. Empty segments are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidGraph` if neither form yields integers.
    pub fn parse(input: &str) -> Result<Self, ValueError> {
        if let Ok(samples) = serde_json::from_str::<Vec<i64>>(input) {
            return Ok(Self(samples));
        }

        input
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>()
                    .map_err(|_| ValueError::InvalidGraph(format!("{part:?} is not an integer")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Returns the samples.
    #[must_use]
    pub fn samples(&self) -> &[i64] {
        &self.0
    }

    /// Returns `true` if the graph has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encodes the samples as the comma-separated list the device expects.
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Vec<i64>> for Graph {
    fn from(samples: Vec<i64>) -> Self {
        Self(samples)
    }
}

/// A text message queued on the device.
///
/// Built through [`Message::builder`], which applies the device defaults and
/// validates the numeric fields. The id range (0-65535) and the graph bounds
/// are enforced by their types.
///
/// # Examples
///
/// ```
/// use obegraensad_sync::types::{Graph, Message};
///
/// let message = Message::builder("hi")
///     .id(3)
///     .graph(Graph::new(vec![1, 2, 3]))
///     .build()
///     .unwrap();
///
/// assert_eq!(message.repeat(), 1);
/// assert_eq!(message.delay(), 50);
/// assert_eq!(message.max_y(), 15);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    repeat: u32,
    id: u16,
    delay: u32,
    graph: Option<Graph>,
    min_y: i16,
    max_y: i16,
}

impl Message {
    /// Default number of repetitions.
    pub const DEFAULT_REPEAT: u32 = 1;
    /// Default scroll delay.
    pub const DEFAULT_DELAY: u32 = 50;
    /// Default lower graph bound.
    pub const DEFAULT_MIN_Y: i16 = 0;
    /// Default upper graph bound.
    pub const DEFAULT_MAX_Y: i16 = 15;

    /// Starts building a message with the given text.
    #[must_use]
    pub fn builder(text: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(text)
    }

    /// Returns the message text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns how often the message repeats.
    #[must_use]
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Returns the message id.
    #[must_use]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Returns the scroll delay.
    #[must_use]
    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Returns the graph, if one is attached and non-empty.
    #[must_use]
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref().filter(|g| !g.is_empty())
    }

    /// Returns the lower graph bound.
    #[must_use]
    pub fn min_y(&self) -> i16 {
        self.min_y
    }

    /// Returns the upper graph bound.
    #[must_use]
    pub fn max_y(&self) -> i16 {
        self.max_y
    }
}

/// Builder for [`Message`].
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    text: String,
    repeat: u32,
    id: u16,
    delay: u32,
    graph: Option<Graph>,
    min_y: i16,
    max_y: i16,
}

impl MessageBuilder {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            repeat: Message::DEFAULT_REPEAT,
            id: 0,
            delay: Message::DEFAULT_DELAY,
            graph: None,
            min_y: Message::DEFAULT_MIN_Y,
            max_y: Message::DEFAULT_MAX_Y,
        }
    }

    /// Sets how often the message repeats (at least 1).
    #[must_use]
    pub fn repeat(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self
    }

    /// Sets the message id.
    #[must_use]
    pub fn id(mut self, id: u16) -> Self {
        self.id = id;
        self
    }

    /// Sets the scroll delay.
    #[must_use]
    pub fn delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    /// Attaches a graph.
    #[must_use]
    pub fn graph(mut self, graph: impl Into<Graph>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    /// Sets the lower graph bound.
    #[must_use]
    pub fn min_y(mut self, min_y: i16) -> Self {
        self.min_y = min_y;
        self
    }

    /// Sets the upper graph bound.
    #[must_use]
    pub fn max_y(mut self, max_y: i16) -> Self {
        self.max_y = max_y;
        self
    }

    /// Validates and builds the message.
    ///
    /// # Errors
    ///
    /// - `ValueError::EmptyText` if the text is empty
    /// - `ValueError::OutOfRange` if `repeat` is zero
    pub fn build(self) -> Result<Message, ValueError> {
        if self.text.is_empty() {
            return Err(ValueError::EmptyText);
        }
        if self.repeat == 0 {
            return Err(ValueError::OutOfRange {
                min: 1,
                max: i64::from(u32::MAX),
                actual: 0,
            });
        }

        Ok(Message {
            text: self.text,
            repeat: self.repeat,
            id: self.id,
            delay: self.delay,
            graph: self.graph,
            min_y: self.min_y,
            max_y: self.max_y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_parse_json_array() {
        assert_eq!(Graph::parse("[-1,0,7]").unwrap().samples(), &[-1, 0, 7]);
    }

    #[test]
    fn graph_parse_csv_with_spaces_and_gaps() {
        assert_eq!(Graph::parse(" 4 , 5,,6 ").unwrap().samples(), &[4, 5, 6]);
    }

    #[test]
    fn graph_parse_single_number() {
        assert_eq!(Graph::parse("5").unwrap().samples(), &[5]);
    }

    #[test]
    fn graph_parse_rejects_non_integers() {
        assert!(matches!(
            Graph::parse("[1.5]"),
            Err(ValueError::InvalidGraph(_))
        ));
        assert!(Graph::parse("one,two").is_err());
    }

    #[test]
    fn graph_csv_encoding() {
        assert_eq!(Graph::new(vec![1, -2, 3]).to_csv(), "1,-2,3");
        assert_eq!(Graph::default().to_csv(), "");
    }

    #[test]
    fn message_defaults() {
        let message = Message::builder("hello").build().unwrap();
        assert_eq!(message.text(), "hello");
        assert_eq!(message.repeat(), 1);
        assert_eq!(message.id(), 0);
        assert_eq!(message.delay(), 50);
        assert_eq!(message.min_y(), 0);
        assert_eq!(message.max_y(), 15);
        assert!(message.graph().is_none());
    }

    #[test]
    fn message_rejects_empty_text() {
        assert_eq!(Message::builder("").build(), Err(ValueError::EmptyText));
    }

    #[test]
    fn message_rejects_zero_repeat() {
        assert!(matches!(
            Message::builder("x").repeat(0).build(),
            Err(ValueError::OutOfRange { actual: 0, .. })
        ));
    }

    #[test]
    fn message_hides_empty_graph() {
        let message = Message::builder("x").graph(Graph::default()).build().unwrap();
        assert!(message.graph().is_none());
    }
}
