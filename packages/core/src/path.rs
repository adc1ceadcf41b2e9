//! Field paths into an input value.

use std::fmt;

/// One step of a field path.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
enum Segment {
    /// A named field of a map.
    Field(String),
    /// A position in an array.
    Index(usize),
}

/// A location inside an input value, such as `Records[0].PartitionKey`.
///
/// The root path is empty and displays as an empty string.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The path of the input value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Child path naming a field of this one.
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name.into()));
        Self { segments }
    }

    /// Child path naming an array element of this one.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
