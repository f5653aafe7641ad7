use thiserror::Error as ThisError;

/// Maximum number of dot-separated segments in a field path: one base field
/// plus up to three relation hops.
pub const MAX_PATH_SEGMENTS: usize = 4;

///
/// PathError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PathError {
    #[error("field path is empty")]
    Empty,

    #[error(
        "field path '{spec}' has {found} segments; at most {MAX_PATH_SEGMENTS} are supported"
    )]
    TooDeep { spec: String, found: usize },
}

///
/// FieldPath
///
/// Ordered field-name segments of one dotted path. Blank segments are
/// dropped during parsing; a path that ends up with no segments is
/// malformed, which is fatal for the run that submitted it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(spec: &str) -> Result<Self, PathError> {
        let raw = spec.trim();
        let segments: Vec<String> = raw
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.len() > MAX_PATH_SEGMENTS {
            return Err(PathError::TooDeep {
                spec: raw.to_string(),
                found: segments.len(),
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
