//! Property tests for fixpoint resolution over randomly composed registries.

use proptest::prelude::*;

use cadre_compose::capabilities::{HasIdentity, Lifecycle, LinkObject, LinkedToParent, Named, Versioned};
use cadre_compose::{CapabilityKind, CapabilitySpec, FrozenModel, Registry, Resolver, Rule};

/// Designer choices for one definition.
#[derive(Debug, Clone)]
struct Shape {
    named: bool,
    auto_named: bool,
    versioned: bool,
    lifecycle: bool,
    parent: Option<usize>,
}

fn shape_strategy(n: usize) -> impl Strategy<Value = Shape> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::option::of(0..n),
    )
        .prop_map(|(named, auto_named, versioned, lifecycle, parent)| Shape {
            named,
            auto_named,
            versioned,
            lifecycle,
            parent,
        })
}

fn model_strategy() -> impl Strategy<Value = (Vec<Shape>, Vec<(usize, usize)>)> {
    (1_usize..7).prop_flat_map(|n| {
        (
            prop::collection::vec(shape_strategy(n), n),
            prop::collection::vec((0..n, 0..n), 0..3),
        )
    })
}

/// Build a registry and return, per definition, the labels the designer attached.
fn build(shapes: &[Shape], links: &[(usize, usize)]) -> (Registry, Vec<Vec<String>>) {
    let mut registry = Registry::new();
    let ids: Vec<_> = (0..shapes.len())
        .map(|i| registry.add_definition(format!("Def{i}"), "gen").unwrap())
        .collect();

    for (i, shape) in shapes.iter().enumerate() {
        let def = ids[i];
        registry.attach(def, CapabilitySpec::new(HasIdentity)).unwrap();
        if shape.named {
            let mut spec = CapabilitySpec::new(Named);
            if shape.auto_named {
                spec = spec.rule(Rule::auto_naming("D{id}-{seq}"));
            }
            registry.attach(def, spec).unwrap();
        }
        if shape.versioned {
            registry.attach(def, CapabilitySpec::new(Versioned)).unwrap();
        }
        if shape.lifecycle {
            registry
                .attach(
                    def,
                    CapabilitySpec::new(Lifecycle::new(["open", "closed"]).initial("open")),
                )
                .unwrap();
        }
        if let Some(parent) = shape.parent {
            registry
                .attach(def, CapabilitySpec::new(LinkedToParent::new(ids[parent])))
                .unwrap();
        }
    }

    for (k, (left, right)) in links.iter().enumerate() {
        let link = registry.add_definition(format!("Link{k}"), "gen").unwrap();
        registry.attach(link, CapabilitySpec::new(HasIdentity)).unwrap();
        registry
            .attach(link, CapabilitySpec::new(LinkObject::new(ids[*left], ids[*right])))
            .unwrap();
    }

    let attached = registry
        .definitions()
        .map(|d| registry.capabilities_of(d.id()).map(|c| c.label()).collect())
        .collect();
    (registry, attached)
}

fn resolve(shapes: &[Shape], links: &[(usize, usize)]) -> (Registry, Vec<Vec<String>>, FrozenModel) {
    let (mut registry, attached) = build(shapes, links);
    let model = Resolver::default()
        .resolve(&mut registry)
        .expect("generated registries are well formed");
    (registry, attached, model)
}

// =============================================================================
// Monotonic growth: designer capabilities keep their order and injections
// are only ever appended after them.
// =============================================================================
proptest! {
    #[test]
    fn designer_capabilities_are_a_prefix_of_the_frozen_list(
        (shapes, links) in model_strategy()
    ) {
        let (_, attached, model) = resolve(&shapes, &links);
        prop_assert_eq!(attached.len(), model.definitions.len());
        for (before, frozen) in attached.iter().zip(&model.definitions) {
            let labels: Vec<&str> = frozen.capabilities.iter().map(|c| c.label.as_str()).collect();
            prop_assert!(labels.len() >= before.len());
            for (expected, actual) in before.iter().zip(&labels) {
                prop_assert_eq!(expected.as_str(), *actual);
            }
            for injected in &frozen.capabilities[before.len()..] {
                prop_assert!(matches!(
                    injected.kind,
                    CapabilityKind::LinkedFromChildren | CapabilityKind::GenericLink
                ));
            }
        }
    }
}

// =============================================================================
// One child companion per distinct child definition.
// =============================================================================
proptest! {
    #[test]
    fn parents_carry_one_companion_per_child_definition(
        (shapes, links) in model_strategy()
    ) {
        let (_, _, model) = resolve(&shapes, &links);
        for (p, _) in shapes.iter().enumerate() {
            let children = shapes.iter().filter(|s| s.parent == Some(p)).count();
            let frozen = model.definition(&format!("Def{p}")).unwrap();
            prop_assert_eq!(frozen.count_of(CapabilityKind::LinkedFromChildren), children);
        }
    }
}

// =============================================================================
// Determinism and idempotence.
// =============================================================================
proptest! {
    #[test]
    fn resolution_is_deterministic_and_idempotent(
        (shapes, links) in model_strategy()
    ) {
        let (mut registry, _, first) = resolve(&shapes, &links);
        let (_, _, rebuilt) = resolve(&shapes, &links);
        prop_assert_eq!(&first, &rebuilt);

        let again = Resolver::default().resolve(&mut registry).unwrap();
        prop_assert_eq!(&first, &again);
        prop_assert_eq!(first.stats.work_items, 2 * first.capability_count());
    }
}

// =============================================================================
// Advice chains follow declaration order regardless of contributor.
// =============================================================================
proptest! {
    #[test]
    fn create_and_update_chains_follow_declaration_order(
        (shapes, links) in model_strategy()
    ) {
        let (_, _, model) = resolve(&shapes, &links);
        for (i, shape) in shapes.iter().enumerate() {
            let frozen = model.definition(&format!("Def{i}")).unwrap();

            let mut before = Vec::new();
            if shape.lifecycle {
                before.push("enter_initial_state");
            }
            if shape.named && shape.auto_named {
                before.push("compute_name");
            }
            prop_assert_eq!(frozen.accessor("create").unwrap().before_names(), before);

            let after: Vec<&str> = if shape.versioned { vec!["bump_version"] } else { vec![] };
            prop_assert_eq!(frozen.accessor("update").unwrap().after_names(), after);
        }
    }
}
