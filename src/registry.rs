//! Registration of record types.
//!
//! A record type lists the constructors that objects may be assembled with.
//! Each constructor names its parameters and their types;
//! the parameter types determine the JSON shape that the value of each key must have.
//!
//! ~~~
//! use safeson::{Constructor, Decoder, Record, Registry};
//!
//! #[derive(Debug, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: Option<String>,
//! }
//!
//! impl Record for Point {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::builder()
//!             .param::<i32>("x")
//!             .param::<i32>("y")
//!             .param::<Option<String>>("label")
//!             .build(|args| {
//!                 Ok(Point {
//!                     x: args.take("x")?,
//!                     y: args.take("y")?,
//!                     label: args.take("label")?,
//!                 })
//!             })]
//!     }
//! }
//!
//! let registry = Registry::builder().register::<Point>()?.build()?;
//! let mut decoder = Decoder::new().with_registry(registry);
//! let point: Point = decoder.parse_as(r#"{"y": 2, "x": 1}"#)?;
//! assert_eq!(point, Point { x: 1, y: 2, label: None });
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ~~~

use crate::intern::{FieldId, KeyInterner};
use crate::shape::{Field, JsonShape, Mismatch, RecordType, ShapeError, Typed};
use core::any::{Any, TypeId};
use core::cmp::Reverse;
use core::fmt::{self, Display};
use core::marker::PhantomData;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Type that JSON objects can be assembled into.
pub trait Record: Sized + 'static {
    /// Constructors that objects can be assembled with.
    fn constructors() -> Vec<Constructor<Self>>;
}

type Factory<T> = Box<dyn Fn(&mut Args) -> Result<T, ArgError> + Send + Sync>;

struct ParamSpec {
    name: &'static str,
    shape: Result<JsonShape, ShapeError>,
}

/// One way to construct a record from named values.
pub struct Constructor<T> {
    params: Vec<ParamSpec>,
    factory: Factory<T>,
}

impl<T: 'static> Constructor<T> {
    /// Start a constructor without parameters.
    pub fn builder() -> ConstructorBuilder<T> {
        ConstructorBuilder {
            params: Vec::new(),
            marker: PhantomData,
        }
    }

    fn signature(&self) -> String {
        let names: Vec<_> = self.params.iter().map(|p| p.name).collect();
        format!("{}({})", core::any::type_name::<T>(), names.join(", "))
    }
}

/// Builder for [`Constructor`].
pub struct ConstructorBuilder<T> {
    params: Vec<ParamSpec>,
    marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ConstructorBuilder<T> {
    /// Add a parameter of type `F`.
    pub fn param<F: Field>(mut self, name: &'static str) -> Self {
        let shape = F::shape();
        self.params.push(ParamSpec { name, shape });
        self
    }

    /// Finish the constructor with a function that builds the record
    /// from the values of its parameters.
    pub fn build<Fun>(self, factory: Fun) -> Constructor<T>
    where
        Fun: Fn(&mut Args) -> Result<T, ArgError> + Send + Sync + 'static,
    {
        Constructor {
            params: self.params,
            factory: Box::new(factory),
        }
    }
}

/// Values of the parameters of a constructor.
#[derive(Debug)]
pub struct Args {
    values: Vec<(Arc<str>, Option<Typed>)>,
}

impl Args {
    pub(crate) fn new(values: Vec<(Arc<str>, Option<Typed>)>) -> Self {
        Self { values }
    }

    /// Remove the value of the parameter `name` and convert it to `F`.
    pub fn take<F: Field>(&mut self, name: &str) -> Result<F, ArgError> {
        let (_, value) = self
            .values
            .iter_mut()
            .find(|(n, _)| &**n == name)
            .ok_or_else(|| ArgError::Unknown(name.into()))?;
        let value = value.take().ok_or_else(|| ArgError::Taken(name.into()))?;
        F::from_typed(value).map_err(|source| ArgError::Mismatch {
            name: name.into(),
            source,
        })
    }
}

/// Failure to construct a record from its arguments.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
    /// the constructor does not declare the parameter
    #[error("no parameter named \"{0}\"")]
    Unknown(String),
    /// the parameter has been taken before
    #[error("parameter \"{0}\" has already been taken")]
    Taken(String),
    /// the parameter was declared with a different type
    #[error("parameter \"{name}\": {source}")]
    Mismatch {
        /// parameter name
        name: String,
        /// conversion error
        source: Mismatch,
    },
    /// the constructor rejected its arguments
    #[error("{0}")]
    Custom(String),
}

impl ArgError {
    /// Reject the arguments with a message.
    pub fn custom(msg: impl Display) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Parameter of a registered constructor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    /// field that the parameter takes its value from
    pub field: FieldId,
    /// whether the parameter may be absent from the object
    pub optional: bool,
}

type ErasedFactory = Box<dyn Fn(&mut Args) -> Result<Box<dyn Any>, ArgError> + Send + Sync>;

/// Registered constructor.
pub struct ConstructorDescriptor {
    signature: String,
    params: Vec<Param>,
    factory: ErasedFactory,
}

impl ConstructorDescriptor {
    /// Type and parameter names, such as `Point(x, y)`.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Parameters, in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Return true if every parameter has a value or is optional.
    pub fn is_satisfied(&self, filled: impl Fn(FieldId) -> bool) -> bool {
        self.params.iter().all(|p| p.optional || filled(p.field))
    }

    pub(crate) fn construct(&self, args: &mut Args) -> Result<Box<dyn Any>, ArgError> {
        (self.factory)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("signature", &self.signature)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Field of a record type, shared by all constructors declaring it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// canonical name
    pub name: Arc<str>,
    /// shape that values of the field must have
    pub shape: JsonShape,
}

/// Everything needed to assemble objects into a record type.
#[derive(Debug)]
pub struct TypeDescriptor {
    record: RecordType,
    fields: Vec<FieldDescriptor>,
    interner: KeyInterner,
    constructors: Vec<ConstructorDescriptor>,
}

impl TypeDescriptor {
    /// Inspect the constructors of `T`.
    pub fn of<T: Record>() -> Result<Self, Error> {
        let record = RecordType::of::<T>();
        let ctors = T::constructors();
        if ctors.is_empty() {
            return Err(Error::NoConstructors(record.name()));
        }

        let mut fields: Vec<FieldDescriptor> = Vec::new();
        let mut conflicts = Vec::new();
        let mut constructors = Vec::new();
        for ctor in ctors {
            let signature = ctor.signature();
            let mut params: Vec<Param> = Vec::new();
            for (position, p) in ctor.params.into_iter().enumerate() {
                if p.name.is_empty() {
                    let constructor = signature;
                    return Err(Error::MissingParameterName { constructor, position });
                }
                let shape = p.shape.map_err(|source| Error::IllegalParameter {
                    constructor: signature.clone(),
                    param: p.name,
                    source,
                })?;

                let field = match fields.iter().position(|f| &*f.name == p.name) {
                    Some(i) => {
                        if fields[i].shape != shape {
                            let conflict = format!("{} ({} VS {})", p.name, fields[i].shape, shape);
                            if !conflicts.contains(&conflict) {
                                conflicts.push(conflict)
                            }
                        }
                        FieldId(i)
                    }
                    None => {
                        let name = p.name.into();
                        fields.push(FieldDescriptor { name, shape: shape.clone() });
                        FieldId(fields.len() - 1)
                    }
                };
                if params.iter().any(|q| q.field == field) {
                    let constructor = signature;
                    return Err(Error::DuplicateParameter { constructor, param: p.name });
                }
                let optional = shape.is_optional();
                params.push(Param { field, optional });
            }

            let factory = ctor.factory;
            let factory: ErasedFactory =
                Box::new(move |args: &mut Args| -> Result<Box<dyn Any>, ArgError> {
                    Ok(Box::new(factory(args)?) as Box<dyn Any>)
                });
            constructors.push(ConstructorDescriptor {
                signature,
                params,
                factory,
            });
        }

        if !conflicts.is_empty() {
            let type_name = record.name();
            return Err(Error::ConflictingShapes { type_name, conflicts });
        }

        // stable, so constructors with equally many parameters keep their order
        constructors.sort_by_key(|c| Reverse(c.params.len()));
        let interner = KeyInterner::new(fields.iter().map(|f| f.name.clone()).collect());
        Ok(Self {
            record,
            fields,
            interner,
            constructors,
        })
    }

    /// Identity of the record type.
    pub fn record(&self) -> RecordType {
        self.record
    }

    /// Union of the parameters of all constructors.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Field with the given identifier.
    pub fn field(&self, id: FieldId) -> &FieldDescriptor {
        &self.fields[id.0]
    }

    /// Table from field names to fields.
    pub fn interner(&self) -> &KeyInterner {
        &self.interner
    }

    /// Constructors, those with the most parameters first.
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }
}

/// Read-only collection of record types.
///
/// A registry can be shared between threads,
/// for example via an [`Arc`] held by several decoders.
#[derive(Debug, Default)]
pub struct Registry {
    types: HashMap<TypeId, TypeDescriptor>,
}

impl Registry {
    /// Start an empty registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Descriptor of the type with the given identifier.
    pub fn get(&self, id: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(&id)
    }

    /// Descriptor of `T`.
    pub fn descriptor<T: Record>(&self) -> Option<&TypeDescriptor> {
        self.get(TypeId::of::<T>())
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Return true if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builder for [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: HashMap<TypeId, TypeDescriptor>,
}

impl RegistryBuilder {
    /// Add `T`, failing if its constructors cannot be used for decoding.
    pub fn register<T: Record>(mut self) -> Result<Self, Error> {
        let descriptor = TypeDescriptor::of::<T>()?;
        debug!(
            "registered {} with {} constructor(s) and {} field(s)",
            descriptor.record.name(),
            descriptor.constructors.len(),
            descriptor.fields.len()
        );
        self.types.insert(TypeId::of::<T>(), descriptor);
        Ok(self)
    }

    /// Finish the registry, failing if any field refers to an unregistered record type.
    pub fn build(self) -> Result<Registry, Error> {
        let mut unmapped = Vec::new();
        for descriptor in self.types.values() {
            for field in &descriptor.fields {
                field.shape.records(&mut |r| {
                    if !self.types.contains_key(&r.id()) && !unmapped.contains(&r.name()) {
                        unmapped.push(r.name())
                    }
                })
            }
        }
        if !unmapped.is_empty() {
            unmapped.sort_unstable();
            return Err(Error::UnmappedTypes(unmapped));
        }
        debug!("built registry with {} type(s)", self.types.len());
        Ok(Registry { types: self.types })
    }
}

/// Registration error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// the type declares no constructors
    #[error("{0} has no constructors")]
    NoConstructors(&'static str),
    /// a parameter name is empty
    #[error("parameter {position} of {constructor} has no name")]
    MissingParameterName {
        /// constructor signature
        constructor: String,
        /// 0-based position of the parameter
        position: usize,
    },
    /// a parameter type has no JSON shape
    #[error("illegal parameter \"{param}\" of {constructor}: {source}")]
    IllegalParameter {
        /// constructor signature
        constructor: String,
        /// parameter name
        param: &'static str,
        /// reason
        source: ShapeError,
    },
    /// a constructor declares the same parameter twice
    #[error("parameter \"{param}\" occurs more than once in {constructor}")]
    DuplicateParameter {
        /// constructor signature
        constructor: String,
        /// parameter name
        param: &'static str,
    },
    /// constructors declare a parameter with different shapes
    #[error("conflicting parameter shapes in {type_name}: {}", .conflicts.join(", "))]
    ConflictingShapes {
        /// record type
        type_name: &'static str,
        /// one entry per parameter, such as `x (Int32 VS String)`
        conflicts: Vec<String>,
    },
    /// record types that are used, but not registered
    #[error("unmapped types: {}", .0.join(", "))]
    UnmappedTypes(Vec<&'static str>),
}
