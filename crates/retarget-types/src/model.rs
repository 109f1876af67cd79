//! Record type descriptors and the type registry
//!
//! A `TypeDescriptor` lists the members of a record type. Predicates over a
//! record resolve member accesses through the descriptor of their declaring
//! type, which is looked up by name in a `TypeRegistry`.

use crate::DataType;
use indexmap::IndexMap;
use parking_lot::RwLock;
use retarget_diagnostics::{RetargetError, RT0300, RT0301, RT0302, RT0303};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building or querying the type model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Type not registered
    #[error("Type not found: {name}")]
    TypeNotFound { name: String },

    /// Type registered twice
    #[error("Duplicate type: {name}")]
    DuplicateType { name: String },

    /// Member declared twice on the same type
    #[error("Duplicate member '{member}' on type {type_name}")]
    DuplicateMember { type_name: String, member: String },

    /// Member type references an unregistered record type
    #[error("Member '{member}' of {type_name} references unknown type {referenced}")]
    UnknownMemberType {
        type_name: String,
        member: String,
        referenced: String,
    },
}

/// Model result type
pub type ModelResult<T> = Result<T, ModelError>;

impl From<ModelError> for RetargetError {
    fn from(err: ModelError) -> Self {
        let (code, type_name) = match &err {
            ModelError::TypeNotFound { name } => (RT0300, name.clone()),
            ModelError::DuplicateType { name } => (RT0301, name.clone()),
            ModelError::DuplicateMember { type_name, .. } => (RT0302, type_name.clone()),
            ModelError::UnknownMemberType { type_name, .. } => (RT0303, type_name.clone()),
        };
        RetargetError::Model {
            code,
            message: err.to_string(),
            type_name: Some(type_name),
        }
    }
}

/// Whether a member is a property or a plain field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MemberKind {
    #[default]
    Property,
    Field,
}

/// A named, typed member of a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    /// Member name (case-sensitive)
    pub name: String,
    /// Static type of the member
    pub data_type: DataType,
    /// Property or field
    #[serde(default)]
    pub kind: MemberKind,
}

impl MemberInfo {
    /// Create a property member
    pub fn property(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            kind: MemberKind::Property,
        }
    }

    /// Create a field member
    pub fn field(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            kind: MemberKind::Field,
        }
    }
}

/// Shape of a record type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name
    pub name: String,
    /// Members in declaration order
    pub members: IndexMap<String, MemberInfo>,
}

impl TypeDescriptor {
    /// Create an empty descriptor
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
        }
    }

    /// Add a property, replacing any earlier member of the same name
    pub fn property(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        let member = MemberInfo::property(name, data_type);
        self.members.insert(member.name.clone(), member);
        self
    }

    /// Add a field, replacing any earlier member of the same name
    pub fn field(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        let member = MemberInfo::field(name, data_type);
        self.members.insert(member.name.clone(), member);
        self
    }

    /// Add a member, rejecting duplicates
    pub fn try_add_member(&mut self, member: MemberInfo) -> ModelResult<()> {
        if self.members.contains_key(&member.name) {
            return Err(ModelError::DuplicateMember {
                type_name: self.name.clone(),
                member: member.name,
            });
        }
        self.members.insert(member.name.clone(), member);
        Ok(())
    }

    /// Look up a member by exact name
    pub fn member(&self, name: &str) -> Option<&MemberInfo> {
        self.members.get(name)
    }

    /// Iterate members in declaration order
    pub fn members(&self) -> impl Iterator<Item = &MemberInfo> {
        self.members.values()
    }

    /// The `DataType` referring to this record
    pub fn data_type(&self) -> DataType {
        DataType::named(&self.name)
    }
}

/// Thread-safe registry of record types
///
/// Cloning the registry yields another handle onto the same set of types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Arc<RwLock<IndexMap<String, Arc<TypeDescriptor>>>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry from a set of descriptors
    pub fn from_types(types: impl IntoIterator<Item = TypeDescriptor>) -> ModelResult<Self> {
        let registry = Self::new();
        for descriptor in types {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Load descriptors from a JSON array
    pub fn from_json(json: &str) -> Result<Self, RetargetError> {
        let types: Vec<TypeDescriptor> = serde_json::from_str(json)
            .map_err(|e| RetargetError::system(retarget_diagnostics::RT0406, e.to_string()))?;
        let registry = Self::from_types(types)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Register a type
    pub fn register(&self, descriptor: TypeDescriptor) -> ModelResult<Arc<TypeDescriptor>> {
        let mut types = self.types.write();
        if types.contains_key(&descriptor.name) {
            return Err(ModelError::DuplicateType {
                name: descriptor.name,
            });
        }
        let descriptor = Arc::new(descriptor);
        types.insert(descriptor.name.clone(), Arc::clone(&descriptor));
        Ok(descriptor)
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.read().get(name).cloned()
    }

    /// Get a type by name, failing if it is not registered
    pub fn resolve(&self, name: &str) -> ModelResult<Arc<TypeDescriptor>> {
        self.get(name).ok_or_else(|| ModelError::TypeNotFound {
            name: name.to_string(),
        })
    }

    /// Check whether a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Look up a member of a registered type
    pub fn member(&self, type_name: &str, member: &str) -> ModelResult<Option<MemberInfo>> {
        Ok(self.resolve(type_name)?.member(member).cloned())
    }

    /// Names of all registered types, in registration order
    pub fn type_names(&self) -> Vec<String> {
        self.types.read().keys().cloned().collect()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if no types are registered
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Check that every record type referenced by a member is registered
    pub fn validate(&self) -> ModelResult<()> {
        let types = self.types.read();
        for descriptor in types.values() {
            for member in descriptor.members() {
                if let Some(referenced) = first_unknown(&member.data_type, &types) {
                    return Err(ModelError::UnknownMemberType {
                        type_name: descriptor.name.clone(),
                        member: member.name.clone(),
                        referenced,
                    });
                }
            }
        }
        Ok(())
    }
}

fn first_unknown(
    data_type: &DataType,
    types: &IndexMap<String, Arc<TypeDescriptor>>,
) -> Option<String> {
    match data_type {
        DataType::Named(name) if !types.contains_key(name) => Some(name.clone()),
        DataType::List(elem) => first_unknown(elem, types),
        DataType::Function { parameters, result } => parameters
            .iter()
            .find_map(|p| first_unknown(p, types))
            .or_else(|| first_unknown(result, types)),
        _ => None,
    }
}
