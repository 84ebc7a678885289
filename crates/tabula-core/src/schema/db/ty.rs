use crate::{
    schema::{Kind, Leaf},
    Error, Result,
};

/// Relational storage type of a column.
///
/// These are the types that appear in `CREATE TABLE` statements. Each SQL
/// flavor renders them with its own spelling.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Boolean,
    Integer,
    UnsignedInteger,

    /// Fixed width text of exactly `n` characters
    Char(u64),

    /// Text with an explicit maximum length
    VarChar(u64),

    Text,
    MediumText,
    LongText,

    /// Closed set of string literals
    Enum(Vec<String>),

    /// Decimal with optional `(precision, scale)`
    Decimal(Option<(u32, u32)>),

    Double,
    Date,
    DateTime,
    Time,
    Timestamp,

    /// Type named verbatim by an override block
    Custom(String),
}

/// Longest `varchar` a utf8mb4 row can hold; longer strings use a text tier.
const VARCHAR_MAX: u64 = 16_383;

impl Type {
    /// Compile a leaf descriptor into its storage type.
    ///
    /// String-like leaves become an enumeration when options are declared.
    /// Otherwise they need a maximum length: `char(n)` when the minimum
    /// equals the maximum, else a text tier picked by the maximum.
    pub fn from_leaf(leaf: &Leaf) -> Result<Type> {
        Ok(match leaf.kind {
            Kind::Any => {
                return Err(Error::invalid_schema(
                    "unsupported type: \"any\" leaves can not be stored in a column",
                ))
            }
            Kind::Base64 | Kind::String => return Type::from_string_leaf(leaf),
            Kind::Bool => Type::Boolean,
            Kind::Date => Type::Date,
            Kind::Datetime => Type::DateTime,
            Kind::Decimal => Type::Decimal(None),
            Kind::Float => Type::Double,
            Kind::Int => Type::Integer,
            Kind::Ip => Type::Char(15),
            Kind::Json => Type::Text,
            Kind::Md5 => Type::Char(32),
            Kind::Price => Type::Decimal(Some((8, 2))),
            Kind::Time => Type::Time,
            Kind::Timestamp => Type::Timestamp,
            Kind::Uint => Type::UnsignedInteger,
            Kind::Uuid | Kind::Uuid4 => Type::Char(36),
        })
    }

    fn from_string_leaf(leaf: &Leaf) -> Result<Type> {
        if let Some(options) = &leaf.options {
            return Ok(Type::Enum(options.clone()));
        }

        let Some(maximum) = leaf.maximum else {
            return Err(Error::invalid_schema(format!(
                "\"{}\" leaves need a maximum length unless an override sets the type",
                leaf.kind
            )));
        };

        if leaf.minimum == Some(maximum) {
            return Ok(Type::Char(maximum));
        }

        Ok(match maximum {
            m if m > 16_777_215 => Type::LongText,
            m if m > 65_535 => Type::MediumText,
            m if m > VARCHAR_MAX => Type::Text,
            m => Type::VarChar(m),
        })
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Integer | Type::UnsignedInteger | Type::Boolean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_kinds() {
        let cases = [
            (Kind::Bool, Type::Boolean),
            (Kind::Float, Type::Double),
            (Kind::Ip, Type::Char(15)),
            (Kind::Md5, Type::Char(32)),
            (Kind::Price, Type::Decimal(Some((8, 2)))),
            (Kind::Uint, Type::UnsignedInteger),
            (Kind::Uuid4, Type::Char(36)),
        ];

        for (kind, expected) in cases {
            assert_eq!(Type::from_leaf(&Leaf::new(kind)).unwrap(), expected);
        }
    }

    #[test]
    fn string_tiers() {
        assert_eq!(Type::from_leaf(&Leaf::string(64)).unwrap(), Type::VarChar(64));
        assert_eq!(
            Type::from_leaf(&Leaf::string(2).min(2)).unwrap(),
            Type::Char(2)
        );
        assert_eq!(
            Type::from_leaf(&Leaf::string(16_383)).unwrap(),
            Type::VarChar(16_383)
        );
        assert_eq!(Type::from_leaf(&Leaf::string(16_384)).unwrap(), Type::Text);
        assert_eq!(Type::from_leaf(&Leaf::string(65_535)).unwrap(), Type::Text);
        assert_eq!(
            Type::from_leaf(&Leaf::string(65_536)).unwrap(),
            Type::MediumText
        );
        assert_eq!(
            Type::from_leaf(&Leaf::string(16_777_215)).unwrap(),
            Type::MediumText
        );
        assert_eq!(
            Type::from_leaf(&Leaf::string(4_294_967_295)).unwrap(),
            Type::LongText
        );
    }

    #[test]
    fn options_make_an_enum() {
        let leaf = Leaf::new(Kind::String).options(["a", "b"]);
        assert_eq!(
            Type::from_leaf(&leaf).unwrap(),
            Type::Enum(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn unsupported_leaves() {
        assert!(Type::from_leaf(&Leaf::new(Kind::Any))
            .unwrap_err()
            .is_invalid_schema());
        assert!(Type::from_leaf(&Leaf::new(Kind::String))
            .unwrap_err()
            .is_invalid_schema());
    }
}
