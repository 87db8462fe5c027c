//! The [`SchemaNode`] data model.
//!
//! This module only defines the shape of an inferred schema and a few
//! constructors; the analysis/merge algorithm that builds and combines
//! these nodes lives in `fionn-tape::schema`, which is the crate that
//! actually implements the type-compatibility matrix.

/// The eight schema types a [`SchemaNode`] can carry.
///
/// `Integer` is a subtype of `Number` (it merges into `Number`, never
/// the reverse) and `Mixed` is absorbing except for `Null`, which only
/// ever sets `nullable` on the surviving type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    /// JSON `null`.
    Null,
    /// JSON `true`/`false`.
    Boolean,
    /// A JSON number representable without loss as a 64-bit integer.
    Integer,
    /// Any other JSON number.
    Number,
    /// A JSON string.
    String,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
    /// Two or more incompatible types were observed at this position.
    Mixed,
}

impl SchemaType {
    /// The Draft-07 primitive name for this type (`Mixed` has none — it
    /// is emitted as the full six-element array by the caller).
    #[must_use]
    pub const fn primitive_name(self) -> Option<&'static str> {
        match self {
            Self::Null => Some("null"),
            Self::Boolean => Some("boolean"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::String => Some("string"),
            Self::Array => Some("array"),
            Self::Object => Some("object"),
            Self::Mixed => None,
        }
    }
}

/// One named entry in an object schema's property map.
#[derive(Debug, Clone)]
pub struct Property {
    /// The property name.
    pub name: Box<str>,
    /// The property's schema.
    pub schema: SchemaNode,
    /// `true` if this property was present in every instance merged
    /// into the enclosing object schema.
    pub required: bool,
}

/// A node in an inferred JSON-Schema tree.
///
/// `properties` is an insertion-ordered list rather than a hash map:
/// Draft-07 emission must preserve property order, object arity in
/// realistic documents is small, and a linear scan avoids pulling in an
/// ordered-map dependency the rest of the workspace does not otherwise
/// need.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// The observed (or merged) type at this position.
    pub schema_type: SchemaType,
    /// `true` if `null` was observed at this position, alongside (or
    /// instead of) `schema_type`.
    pub nullable: bool,
    /// Meaningful only as a property of an enclosing object: `true` if
    /// the property was present in every merged instance.
    pub required: bool,
    /// The element schema, for `Array` nodes.
    pub items: Option<Box<SchemaNode>>,
    /// The property map, for `Object` nodes.
    pub properties: Vec<Property>,
}

impl SchemaNode {
    /// A leaf node of the given type, required and non-nullable.
    #[must_use]
    pub const fn leaf(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            nullable: false,
            required: true,
            items: None,
            properties: Vec::new(),
        }
    }

    /// The canonical `{ Null }` node used for empty-array items and for
    /// properties that are absent in one side of a merge.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            schema_type: SchemaType::Null,
            nullable: true,
            required: false,
            items: None,
            properties: Vec::new(),
        }
    }

    /// Find a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| &*p.name == name)
    }

    /// Append a property, replacing any existing entry of the same name.
    pub fn push_property(&mut self, name: impl Into<Box<str>>, schema: SchemaNode, required: bool) {
        let name = name.into();
        if let Some(existing) = self.properties.iter_mut().find(|p| p.name == name) {
            existing.schema = schema;
            existing.required = required;
        } else {
            self.properties.push(Property {
                name,
                schema,
                required,
            });
        }
    }
}
