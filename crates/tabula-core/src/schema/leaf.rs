use super::{Kind, Overrides};

/// A scalar schema node.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub kind: Kind,

    /// Lower bound. A length for string kinds.
    pub minimum: Option<u64>,

    /// Upper bound. A length for string kinds.
    pub maximum: Option<u64>,

    /// Closed set of accepted string values.
    pub options: Option<Vec<String>>,

    /// When `true` the column accepts `NULL`.
    pub optional: bool,

    pub overrides: Overrides,
}

impl Leaf {
    pub fn new(kind: Kind) -> Leaf {
        Leaf {
            kind,
            minimum: None,
            maximum: None,
            options: None,
            optional: false,
            overrides: Overrides::default(),
        }
    }

    /// A string leaf bounded to `maximum` characters.
    pub fn string(maximum: u64) -> Leaf {
        Leaf::new(Kind::String).max(maximum)
    }

    pub fn min(mut self, minimum: u64) -> Leaf {
        self.minimum = Some(minimum);
        self
    }

    pub fn max(mut self, maximum: u64) -> Leaf {
        self.maximum = Some(maximum);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Leaf
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn optional(mut self) -> Leaf {
        self.optional = true;
        self
    }

    pub fn required(mut self) -> Leaf {
        self.optional = false;
        self
    }

    /// Attach a backend override block, e.g. `{"type": "char(2)"}`.
    pub fn with_override(mut self, backend: &str, block: serde_json::Value) -> Leaf {
        self.overrides.insert(backend, block);
        self
    }
}
