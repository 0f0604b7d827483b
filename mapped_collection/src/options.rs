//! Configuration of a mapped collection.
//!
//! [`CollectionOptions`] deserialises with serde and can therefore be read
//! from JSON values or layered through `figment` providers.

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::{Map, Value};

use crate::{
    CollectionResult, CollectionResultExt, FormTypeId, MappedVariants, TypeDescriptor, TypeMap,
};

const DEFAULT_DISCRIMINATOR: &str = "type";
const DEFAULT_PROTOTYPE_NAME: &str = "__name__";
const CHILD_BLOCK_NAME: &str = "entry";

/// Options controlling discrimination, resizing, and the prototype.
///
/// ```rust
/// use mapped_collection::{CollectionOptions, PrototypeOption, TypeDescriptor};
/// use serde_json::json;
///
/// let options = CollectionOptions::from_value(json!({
///     "map": {"bar": "bar_form", "baz": {"form_type": "baz_form", "data_class": "Baz"}},
///     "allow_add": true,
///     "prototype": "bar_form",
/// }))?;
/// assert_eq!(options.discriminator, "type");
/// assert_eq!(options.prototype_name, "__name__");
/// assert_eq!(
///     options.prototype,
///     PrototypeOption::Enabled(TypeDescriptor::new("bar_form")),
/// );
/// # Ok::<_, mapped_collection::MappedCollectionError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionOptions {
    /// Property path of the discriminator inside each element.
    pub discriminator: String,
    /// Discriminator value to descriptor, in configuration order.
    ///
    /// Accepts a table keyed by discriminator or an array of
    /// `{ discriminator, form_type, data_class }` entries.
    #[serde(deserialize_with = "deserialize_map")]
    pub map: IndexMap<String, TypeDescriptor>,
    /// Options merged into every child form.
    pub options: Map<String, Value>,
    /// Whether submitted elements without a child are added.
    pub allow_add: bool,
    /// Whether children missing from submitted input are removed.
    pub allow_delete: bool,
    /// Template form for new elements.
    pub prototype: PrototypeOption,
    /// Placeholder name given to the prototype.
    pub prototype_name: String,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            discriminator: DEFAULT_DISCRIMINATOR.to_owned(),
            map: IndexMap::new(),
            options: Map::new(),
            allow_add: false,
            allow_delete: false,
            prototype: PrototypeOption::Disabled,
            prototype_name: DEFAULT_PROTOTYPE_NAME.to_owned(),
        }
    }
}

impl CollectionOptions {
    /// Default options with an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the discriminator path.
    #[must_use]
    pub fn with_discriminator(mut self, path: impl Into<String>) -> Self {
        self.discriminator = path.into();
        self
    }

    /// Map `discriminator` to `descriptor`.
    #[must_use]
    pub fn with_type(
        mut self,
        discriminator: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Self {
        self.map.insert(discriminator.into(), descriptor);
        self
    }

    /// Map every variant of `V`.
    #[must_use]
    pub fn with_variants<V: MappedVariants>(mut self) -> Self {
        for variant in V::VARIANTS {
            self.map
                .insert(variant.discriminator().to_owned(), variant.descriptor());
        }
        self
    }

    /// Add an option passed to every child form.
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Allow submitted input to add elements.
    #[must_use]
    pub const fn with_allow_add(mut self, allow_add: bool) -> Self {
        self.allow_add = allow_add;
        self
    }

    /// Allow submitted input to remove elements.
    #[must_use]
    pub const fn with_allow_delete(mut self, allow_delete: bool) -> Self {
        self.allow_delete = allow_delete;
        self
    }

    /// Configure the prototype form.
    #[must_use]
    pub fn with_prototype(mut self, prototype: PrototypeOption) -> Self {
        self.prototype = prototype;
        self
    }

    /// Set the prototype placeholder name.
    #[must_use]
    pub fn with_prototype_name(mut self, name: impl Into<String>) -> Self {
        self.prototype_name = name.into();
        self
    }

    /// Deserialise options from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::Options`] when `value` does not
    /// describe valid options.
    pub fn from_value(value: Value) -> CollectionResult<Self> {
        serde_json::from_value(value).into_collection()
    }

    /// Extract options from a prepared figment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::Options`] when extraction
    /// fails.
    pub fn from_figment(figment: &Figment) -> CollectionResult<Self> {
        figment.extract().into_collection()
    }

    /// Layer defaults, a TOML file, and prefixed environment variables.
    ///
    /// Later layers win. Nested keys in the environment are separated by a
    /// double underscore, so `APP_MAP__BAR=bar_form` maps `bar`.
    ///
    /// Figment keeps dictionaries sorted by key, so a `[map]` table loaded
    /// this way comes back in alphabetical order. Declare the map as an array
    /// of `[[map]]` entries when the order of valid values matters:
    ///
    /// ```toml
    /// [[map]]
    /// discriminator = "zeta"
    /// form_type = "zeta_form"
    ///
    /// [[map]]
    /// discriminator = "alpha"
    /// form_type = "alpha_form"
    /// ```
    ///
    /// ```rust
    /// use mapped_collection::CollectionOptions;
    ///
    /// let figment = CollectionOptions::figment("blocks.toml", "BLOCKS_");
    /// let options = CollectionOptions::from_figment(&figment)?;
    /// assert!(options.map.is_empty());
    /// # Ok::<_, mapped_collection::MappedCollectionError>(())
    /// ```
    #[must_use]
    pub fn figment(file: impl AsRef<Path>, env_prefix: &str) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file.as_ref()))
            .merge(Env::prefixed(env_prefix).split("__"))
    }

    /// Build the type map.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MappedCollectionError::InvalidConfiguration`] when the
    /// map is empty.
    pub fn type_map(&self) -> CollectionResult<TypeMap> {
        TypeMap::new(
            self.map
                .iter()
                .map(|(discriminator, descriptor)| (discriminator.as_str(), descriptor.clone())),
        )
    }

    /// Options passed to every child, with `block_name` forced to `entry`.
    #[must_use]
    pub fn child_options(&self) -> Map<String, Value> {
        let mut options = self.options.clone();
        options.insert(
            "block_name".to_owned(),
            Value::String(CHILD_BLOCK_NAME.to_owned()),
        );
        options
    }
}

/// Whether and how the prototype form is built.
///
/// Configured as `false` or as a descriptor (a bare form type name or a
/// `{ form_type, data_class }` table).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PrototypeRepr", into = "PrototypeRepr")]
pub enum PrototypeOption {
    /// No prototype.
    #[default]
    Disabled,
    /// Build the prototype from this descriptor.
    Enabled(TypeDescriptor),
}

impl PrototypeOption {
    /// The prototype descriptor, when enabled.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&TypeDescriptor> {
        match self {
            Self::Disabled => None,
            Self::Enabled(descriptor) => Some(descriptor),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MapRepr {
    Table(IndexMap<String, TypeDescriptor>),
    Entries(Vec<MapEntry>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MapEntry {
    discriminator: String,
    form_type: FormTypeId,
    #[serde(default)]
    data_class: Option<String>,
}

fn deserialize_map<'de, D>(deserializer: D) -> Result<IndexMap<String, TypeDescriptor>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match MapRepr::deserialize(deserializer)? {
        MapRepr::Table(table) => return Ok(table),
        MapRepr::Entries(entries) => entries,
    };
    let mut map = IndexMap::with_capacity(entries.len());
    for entry in entries {
        if map.contains_key(&entry.discriminator) {
            return Err(D::Error::custom(format!(
                "duplicate discriminator `{}` in map",
                entry.discriminator
            )));
        }
        let descriptor = match entry.data_class {
            Some(data_class) => TypeDescriptor::new(entry.form_type).with_data_class(data_class),
            None => TypeDescriptor::new(entry.form_type),
        };
        map.insert(entry.discriminator, descriptor);
    }
    Ok(map)
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PrototypeRepr {
    Flag(bool),
    Descriptor(TypeDescriptor),
}

impl TryFrom<PrototypeRepr> for PrototypeOption {
    type Error = String;

    fn try_from(repr: PrototypeRepr) -> Result<Self, Self::Error> {
        match repr {
            PrototypeRepr::Flag(false) => Ok(Self::Disabled),
            PrototypeRepr::Flag(true) => {
                Err("prototype must name a form type or be false".to_owned())
            }
            PrototypeRepr::Descriptor(descriptor) => Ok(Self::Enabled(descriptor)),
        }
    }
}

impl From<PrototypeOption> for PrototypeRepr {
    fn from(option: PrototypeOption) -> Self {
        match option {
            PrototypeOption::Disabled => Self::Flag(false),
            PrototypeOption::Enabled(descriptor) => Self::Descriptor(descriptor),
        }
    }
}
