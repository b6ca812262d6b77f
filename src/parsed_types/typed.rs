//! Typing support: [`PrimitiveType`], [`Type`], [`Typed`] elements and
//! [`TypedList`]s, plus the [`Types`] and [`Constants`] domain sections.

use crate::parsed_types::{Name, Variable};
use std::ops::Deref;

/// The `object` type.
pub const TYPE_OBJECT: PrimitiveType = PrimitiveType(Name::new_static("object"));

/// A primitive type.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct PrimitiveType(Name);

impl PrimitiveType {
    pub const fn new(name: Name) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &Name {
        &self.0
    }
}

impl<T> From<T> for PrimitiveType
where
    T: Into<Name>,
{
    fn from(value: T) -> Self {
        Self(value.into())
    }
}

/// A type selection from `<primitive-type> | (either <primitive-type>⁺)`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Type {
    /// The type is exactly this named type.
    Exactly(PrimitiveType),
    /// The type is either of these named types.
    EitherOf(Vec<PrimitiveType>),
}

impl Type {
    /// The predefined type `object`.
    pub const OBJECT: Type = Type::Exactly(TYPE_OBJECT);

    pub fn get_primitive(&self) -> Option<&PrimitiveType> {
        match self {
            Type::Exactly(p) => Some(p),
            Type::EitherOf(_) => None,
        }
    }
}

impl Default for Type {
    fn default() -> Self {
        Self::OBJECT
    }
}

impl From<&str> for Type {
    fn from(value: &str) -> Self {
        Self::Exactly(value.into())
    }
}

impl From<PrimitiveType> for Type {
    fn from(value: PrimitiveType) -> Self {
        Self::Exactly(value)
    }
}

impl<P> FromIterator<P> for Type
where
    P: Into<PrimitiveType>,
{
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self::EitherOf(iter.into_iter().map(|x| x.into()).collect())
    }
}

/// A typed element.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Typed<O>(O, Type);

impl<O> Typed<O> {
    pub const fn new(value: O, r#type: Type) -> Self {
        Self(value, r#type)
    }

    pub const fn new_object(value: O) -> Self {
        Self::new(value, Type::OBJECT)
    }

    /// Gets the value.
    pub const fn value(&self) -> &O {
        &self.0
    }

    /// Gets the assigned type.
    pub const fn type_(&self) -> &Type {
        &self.1
    }
}

impl<O> From<O> for Typed<O> {
    fn from(value: O) -> Self {
        Typed::new_object(value)
    }
}

impl<O> Deref for Typed<O> {
    type Target = O;

    fn deref(&self) -> &Self::Target {
        self.value()
    }
}

/// Wraps a value into a [`Typed`].
pub trait ToTyped<T> {
    fn to_typed<I: Into<Type>>(self, r#type: I) -> Typed<T>;

    fn to_typed_either<I: IntoIterator<Item = P>, P: Into<PrimitiveType>>(
        self,
        types: I,
    ) -> Typed<T>;
}

impl ToTyped<Name> for Name {
    fn to_typed<I: Into<Type>>(self, r#type: I) -> Typed<Name> {
        Typed::new(self, r#type.into())
    }

    fn to_typed_either<I: IntoIterator<Item = P>, P: Into<PrimitiveType>>(
        self,
        types: I,
    ) -> Typed<Name> {
        Typed::new(self, Type::from_iter(types))
    }
}

impl ToTyped<Variable> for Variable {
    fn to_typed<I: Into<Type>>(self, r#type: I) -> Typed<Variable> {
        Typed::new(self, r#type.into())
    }

    fn to_typed_either<I: IntoIterator<Item = P>, P: Into<PrimitiveType>>(
        self,
        types: I,
    ) -> Typed<Variable> {
        Typed::new(self, Type::from_iter(types))
    }
}

/// A list of typed elements.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct TypedList<T>(Vec<Typed<T>>);

pub type TypedNames = TypedList<Name>;
pub type TypedVariables = TypedList<Variable>;

impl<T> TypedList<T> {
    pub const fn new(list: Vec<Typed<T>>) -> Self {
        Self(list)
    }

    /// Gets the values.
    pub fn value(&self) -> &[Typed<T>] {
        self.0.as_slice()
    }

    pub(crate) fn push(&mut self, item: Typed<T>) {
        self.0.push(item);
    }
}

impl<T> From<Vec<Typed<T>>> for TypedList<T> {
    fn from(value: Vec<Typed<T>>) -> Self {
        TypedList::new(value)
    }
}

impl<T> FromIterator<Typed<T>> for TypedList<T> {
    fn from_iter<I: IntoIterator<Item = Typed<T>>>(iter: I) -> Self {
        TypedList::new(iter.into_iter().collect())
    }
}

impl<T> Deref for TypedList<T> {
    type Target = [Typed<T>];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

impl<T> IntoIterator for TypedList<T> {
    type Item = Typed<T>;
    type IntoIter = std::vec::IntoIter<Typed<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The `(:types …)` section. The `object` type is always present.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Types(TypedNames);

impl Types {
    pub fn new(mut typed_names: TypedNames) -> Self {
        let contains_object = typed_names
            .iter()
            .any(|typed| typed.value() == TYPE_OBJECT.name());
        if !contains_object {
            typed_names.push(Typed::new(TYPE_OBJECT.name().clone(), Type::OBJECT));
        }

        Self(typed_names)
    }

    pub fn values(&self) -> &TypedNames {
        &self.0
    }
}

impl Default for Types {
    fn default() -> Self {
        Self(TypedNames::from_iter([Typed::new(
            TYPE_OBJECT.name().clone(),
            Type::OBJECT,
        )]))
    }
}

impl Deref for Types {
    type Target = TypedNames;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<TypedNames> for Types {
    fn from(value: TypedNames) -> Self {
        Types::new(value)
    }
}

/// The `(:constants …)` section.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct Constants(TypedNames);

impl Constants {
    pub const fn new(names: TypedNames) -> Self {
        Self(names)
    }

    pub fn values(&self) -> &TypedNames {
        &self.0
    }
}

impl Deref for Constants {
    type Target = TypedNames;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<TypedNames> for Constants {
    fn from(value: TypedNames) -> Self {
        Constants::new(value)
    }
}
