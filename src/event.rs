//! Log event model
//!
//! `LogEvent` is the unit that producers hand to the sink. It is built once,
//! travels through the bounded buffer by value, and is bound into the insert
//! statement by the worker. Rendering of the message template is the host's
//! job; the event carries the rendered form alongside the template.

use chrono::{DateTime, FixedOffset, Local};

use crate::properties::PropertyValue;

/// Severity levels, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Verbose,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

impl Level {
    /// The Pascal-cased name stored in the `Level` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "Verbose",
            Level::Debug => "Debug",
            Level::Information => "Information",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Fatal => "Fatal",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured log record.
///
/// # Example
///
/// ```ignore
/// use sqlog::{Level, LogEvent};
///
/// let event = LogEvent::now(Level::Information, "user {name} logged in")
///     .with_rendered("user alice logged in")
///     .with_property("name", "alice");
/// sink.emit(event);
/// ```
#[derive(Debug, Clone)]
pub struct LogEvent {
    timestamp: DateTime<FixedOffset>,
    level: Level,
    message_template: String,
    rendered_message: Option<String>,
    exception: Option<String>,
    properties: Vec<(String, PropertyValue)>,
}

impl LogEvent {
    /// Create an event with an explicit timestamp.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        level: Level,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            message_template: message_template.into(),
            rendered_message: None,
            exception: None,
            properties: Vec::new(),
        }
    }

    /// Create an event stamped with the current local time.
    pub fn now(level: Level, message_template: impl Into<String>) -> Self {
        Self::new(Local::now().fixed_offset(), level, message_template)
    }

    /// Attach the host-rendered form of the message template.
    pub fn with_rendered(mut self, rendered: impl Into<String>) -> Self {
        self.rendered_message = Some(rendered.into());
        self
    }

    /// Attach a stringified exception chain.
    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    /// Attach a named property. Empty names are ignored.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.properties.push((name, value.into()));
        }
        self
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// The rendered message, falling back to the raw template text when the
    /// host supplied no rendering.
    pub fn rendered_message(&self) -> &str {
        self.rendered_message
            .as_deref()
            .unwrap_or(&self.message_template)
    }

    /// The exception text, empty when absent (the column is never NULL).
    pub fn exception_text(&self) -> &str {
        self.exception.as_deref().unwrap_or("")
    }

    pub fn properties(&self) -> &[(String, PropertyValue)] {
        &self.properties
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;
