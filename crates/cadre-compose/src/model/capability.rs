//! Capability instances and the unattached spec designers build them from.

use std::sync::Arc;

use cadre_core::types::{AccessorId, BindingId, CapabilityId, DefinitionId, HelperId, SmallVec4};

use super::behavior::downcast_behavior;
use super::{CapabilityBehavior, CapabilityKind, CapabilityMode, Field, Rule};

/// Progress of one capability through the two resolution phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CapabilityState {
    Pending,
    /// Structural phase complete; rules sealed.
    Resolved,
    Finalized,
}

/// A declared sibling dependency and, once checked, the sibling it bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub kind: CapabilityKind,
    pub resolved: Option<CapabilityId>,
}

/// A capability as built by designer code, before it joins a definition.
#[derive(Debug, Clone)]
pub struct CapabilitySpec {
    pub(crate) kind: CapabilityKind,
    pub(crate) instance: String,
    pub(crate) behavior: Arc<dyn CapabilityBehavior>,
    pub(crate) declared_owner: Option<DefinitionId>,
    pub(crate) rules: Vec<Rule>,
}

impl CapabilitySpec {
    pub fn new(behavior: impl CapabilityBehavior + 'static) -> Self {
        let kind = behavior.kind();
        Self {
            kind,
            instance: String::new(),
            behavior: Arc::new(behavior),
            declared_owner: None,
            rules: Vec::new(),
        }
    }

    /// Disambiguate repeated kinds on one definition.
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    /// The definition this capability was built for; attaching it anywhere
    /// else is an ownership error.
    pub fn owned_by(mut self, owner: DefinitionId) -> Self {
        self.declared_owner = Some(owner);
        self
    }

    /// Queue a rule; its target type is checked on attach.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn instance_name(&self) -> &str {
        &self.instance
    }

    pub fn label(&self) -> String {
        self.kind.label(&self.instance)
    }
}

/// A capability attached to a definition.
#[derive(Debug)]
pub struct Capability {
    pub(crate) id: CapabilityId,
    pub(crate) kind: CapabilityKind,
    pub(crate) instance: String,
    pub(crate) owner: DefinitionId,
    pub(crate) behavior: Arc<dyn CapabilityBehavior>,
    pub(crate) dependencies: SmallVec4<Dependency>,
    pub(crate) targets: Vec<DefinitionId>,
    pub(crate) fields: Vec<Field>,
    pub(crate) accessors: Vec<AccessorId>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) bindings: Vec<BindingId>,
    pub(crate) injections: Vec<(DefinitionId, CapabilityId)>,
    pub(crate) helpers: Vec<HelperId>,
    pub(crate) state: CapabilityState,
    pub(crate) mode: Option<CapabilityMode>,
}

impl Capability {
    pub(crate) fn from_spec(id: CapabilityId, owner: DefinitionId, spec: CapabilitySpec) -> Self {
        let dependencies = spec
            .behavior
            .dependencies()
            .into_iter()
            .map(|kind| Dependency {
                kind,
                resolved: None,
            })
            .collect();
        let targets = spec.behavior.targets();
        Self {
            id,
            kind: spec.kind,
            instance: spec.instance,
            owner,
            behavior: spec.behavior,
            dependencies,
            targets,
            fields: Vec::new(),
            accessors: Vec::new(),
            rules: spec.rules,
            bindings: Vec::new(),
            injections: Vec::new(),
            helpers: Vec::new(),
            state: CapabilityState::Pending,
            mode: None,
        }
    }

    pub fn id(&self) -> CapabilityId {
        self.id
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn label(&self) -> String {
        self.kind.label(&self.instance)
    }

    pub fn owner(&self) -> DefinitionId {
        self.owner
    }

    pub fn behavior(&self) -> &dyn CapabilityBehavior {
        self.behavior.as_ref()
    }

    /// The behavior as its concrete type, if it is one.
    pub fn behavior_as<T: 'static>(&self) -> Option<&T> {
        downcast_behavior::<T>(self.behavior.as_ref())
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn targets(&self) -> &[DefinitionId] {
        &self.targets
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn accessors(&self) -> &[AccessorId] {
        &self.accessors
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn bindings(&self) -> &[BindingId] {
        &self.bindings
    }

    pub fn injections(&self) -> &[(DefinitionId, CapabilityId)] {
        &self.injections
    }

    pub fn helpers(&self) -> &[HelperId] {
        &self.helpers
    }

    pub fn state(&self) -> CapabilityState {
        self.state
    }

    /// The sealed behavior mode; `None` until the structural phase completes.
    pub fn mode(&self) -> Option<&CapabilityMode> {
        self.mode.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.state >= CapabilityState::Resolved
    }

    /// Whether `definition` is the owner or a declared mutation target.
    pub fn may_mutate(&self, definition: DefinitionId) -> bool {
        definition == self.owner || self.targets.contains(&definition)
    }
}
