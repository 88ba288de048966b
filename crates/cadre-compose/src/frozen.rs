//! The immutable model handed to code sinks.

use serde::{Deserialize, Serialize};

use crate::model::{
    AdvicePosition, Argument, BindingState, CapabilityKind, CapabilityMode, CapabilityShape,
    Field, Rule, TypeRef,
};
use crate::registry::Registry;
use crate::resolve::HelperDecl;

/// Counters for one resolution run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionStats {
    pub work_items: usize,
    pub structural_runs: usize,
    pub finalize_runs: usize,
    pub injections: usize,
    pub deferred_bindings: usize,
}

/// One capability injected by another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionRecord {
    pub definition: String,
    pub capability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenCapability {
    pub kind: CapabilityKind,
    pub instance: String,
    pub label: String,
    pub mode: CapabilityMode,
    pub dependencies: Vec<CapabilityKind>,
    pub rules: Vec<Rule>,
    pub fields: Vec<String>,
    pub accessors: Vec<String>,
    pub injections: Vec<InjectionRecord>,
    pub helpers: Vec<String>,
}

/// Advice as it appears in an accessor's resolved chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRef {
    pub name: String,
    pub source_definition: String,
    pub source_capability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenAccessor {
    pub name: String,
    pub owner: String,
    pub arguments: Vec<Argument>,
    pub result: Option<TypeRef>,
    pub unique_result: bool,
    pub mutating: bool,
    /// Runs before the body, in declaration order.
    pub before: Vec<AdviceRef>,
    /// Runs after the body, in declaration order.
    pub after: Vec<AdviceRef>,
}

impl FrozenAccessor {
    pub fn before_names(&self) -> Vec<&str> {
        self.before.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn after_names(&self) -> Vec<&str> {
        self.after.iter().map(|a| a.name.as_str()).collect()
    }
}

/// A satisfied binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenBinding {
    pub capability: String,
    pub target: String,
    pub shape: CapabilityShape,
    pub satisfied_by: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenDefinition {
    pub name: String,
    pub module: String,
    pub capabilities: Vec<FrozenCapability>,
    /// Fields of every capability, in capability order.
    pub fields: Vec<Field>,
    pub accessors: Vec<FrozenAccessor>,
    pub bindings: Vec<FrozenBinding>,
}

impl FrozenDefinition {
    /// First capability of `kind`.
    pub fn capability(&self, kind: CapabilityKind) -> Option<&FrozenCapability> {
        self.capabilities.iter().find(|c| c.kind == kind)
    }

    pub fn capability_instance(&self, kind: CapabilityKind, instance: &str) -> Option<&FrozenCapability> {
        self.capabilities
            .iter()
            .find(|c| c.kind == kind && c.instance == instance)
    }

    pub fn count_of(&self, kind: CapabilityKind) -> usize {
        self.capabilities.iter().filter(|c| c.kind == kind).count()
    }

    pub fn accessor(&self, name: &str) -> Option<&FrozenAccessor> {
        self.accessors.iter().find(|a| a.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The resolved registry: definitions in registration order, shared
/// helpers, and run counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenModel {
    pub definitions: Vec<FrozenDefinition>,
    pub helpers: Vec<HelperDecl>,
    pub stats: ResolutionStats,
}

impl FrozenModel {
    pub fn definition(&self, name: &str) -> Option<&FrozenDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn helper(&self, key: &str) -> Option<&HelperDecl> {
        self.helpers.iter().find(|h| h.key == key)
    }

    pub fn capability_count(&self) -> usize {
        self.definitions.iter().map(|d| d.capabilities.len()).sum()
    }

    /// Snapshot a fully resolved registry.
    pub(crate) fn capture(
        registry: &Registry,
        helpers: Vec<HelperDecl>,
        stats: ResolutionStats,
    ) -> Self {
        let definitions = registry
            .definitions()
            .map(|definition| {
                let mut frozen = FrozenDefinition {
                    name: definition.name().to_string(),
                    module: definition.module().to_string(),
                    capabilities: Vec::new(),
                    fields: Vec::new(),
                    accessors: Vec::new(),
                    bindings: Vec::new(),
                };

                for cap in registry.capabilities_of(definition.id()) {
                    frozen.fields.extend(cap.fields().iter().cloned());

                    for accessor_id in cap.accessors() {
                        let accessor = registry.accessor(*accessor_id);
                        let chain = |position: AdvicePosition| {
                            accessor
                                .chain(position)
                                .into_iter()
                                .map(|advice| {
                                    let source = registry.capability(advice.source);
                                    AdviceRef {
                                        name: advice.name.clone(),
                                        source_definition: registry
                                            .definition(source.owner())
                                            .name()
                                            .to_string(),
                                        source_capability: source.label(),
                                    }
                                })
                                .collect::<Vec<_>>()
                        };
                        frozen.accessors.push(FrozenAccessor {
                            name: accessor.name.clone(),
                            owner: cap.label(),
                            arguments: accessor.arguments.clone(),
                            result: accessor.result.clone(),
                            unique_result: accessor.unique_result,
                            mutating: accessor.mutating,
                            before: chain(AdvicePosition::Before),
                            after: chain(AdvicePosition::After),
                        });
                    }

                    for binding_id in cap.bindings() {
                        let binding = registry.binding(*binding_id);
                        if let BindingState::Bound(found) = binding.state {
                            frozen.bindings.push(FrozenBinding {
                                capability: cap.label(),
                                target: registry.definition(binding.target).name().to_string(),
                                shape: binding.shape.clone(),
                                satisfied_by: registry.capability(found).label(),
                            });
                        }
                    }

                    frozen.capabilities.push(FrozenCapability {
                        kind: cap.kind(),
                        instance: cap.instance().to_string(),
                        label: cap.label(),
                        mode: cap.mode().cloned().unwrap_or(CapabilityMode::Plain),
                        dependencies: cap.dependencies().iter().map(|d| d.kind).collect(),
                        rules: cap.rules().to_vec(),
                        fields: cap.fields().iter().map(|f| f.name.clone()).collect(),
                        accessors: cap
                            .accessors()
                            .iter()
                            .map(|id| registry.accessor(*id).name.clone())
                            .collect(),
                        injections: cap
                            .injections()
                            .iter()
                            .map(|(target, injected)| InjectionRecord {
                                definition: registry.definition(*target).name().to_string(),
                                capability: registry.capability(*injected).label(),
                            })
                            .collect(),
                        helpers: cap
                            .helpers()
                            .iter()
                            .map(|id| helpers[id.index()].key.clone())
                            .collect(),
                    });
                }
                frozen
            })
            .collect();

        Self {
            definitions,
            helpers,
            stats,
        }
    }
}
