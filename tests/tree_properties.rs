use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vfdt::classifiers::hoeffding_tree::compute_hoeffding_bound;
use vfdt::classifiers::hoeffding_tree::nodes::Node;
use vfdt::classifiers::hoeffding_tree::split_criteria::{InfoGainSplitCriterion, SplitCriterion};
use vfdt::classifiers::{Classifier, HoeffdingTree, HoeffdingTreeConfig};
use vfdt::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use vfdt::core::class_distribution::ClassDistribution;
use vfdt::core::instance_header::InstanceHeader;
use vfdt::core::instances::DenseInstance;

const EPS: f64 = 1e-12;

fn class_ab() -> AttributeRef {
    Arc::new(NominalAttribute::from_labels("class", vec!["A".into(), "B".into()])) as AttributeRef
}

fn numeric_header() -> Arc<InstanceHeader> {
    Arc::new(InstanceHeader::new(
        "numeric".into(),
        vec![Arc::new(NumericAttribute::new("x".into())) as AttributeRef, class_ab()],
        1,
    ))
}

fn nominal_header() -> Arc<InstanceHeader> {
    let att = NominalAttribute::from_labels("att", vec!["x".into(), "y".into()]);
    Arc::new(InstanceHeader::new(
        "nominal".into(),
        vec![Arc::new(att) as AttributeRef, class_ab()],
        1,
    ))
}

fn mixed_header() -> Arc<InstanceHeader> {
    let colour = NominalAttribute::from_labels("colour", vec!["red".into(), "blue".into()]);
    Arc::new(InstanceHeader::new(
        "mixed".into(),
        vec![
            Arc::new(NumericAttribute::new("x".into())) as AttributeRef,
            Arc::new(colour) as AttributeRef,
            class_ab(),
        ],
        2,
    ))
}

fn row(h: &Arc<InstanceHeader>, values: Vec<f64>) -> DenseInstance {
    DenseInstance::new(Arc::clone(h), values, 1.0)
}

fn fresh_tree(config: HoeffdingTreeConfig, h: &Arc<InstanceHeader>) -> HoeffdingTree {
    let mut tree = HoeffdingTree::new(config).unwrap();
    tree.set_model_context(Arc::clone(h)).unwrap();
    tree
}

fn random_rows(h: &Arc<InstanceHeader>, seed: u64, n: usize) -> Vec<DenseInstance> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let x: f64 = rng.random_range(0.0..10.0);
            let colour = f64::from(rng.random_range(0u8..2));
            let noisy = rng.random_range(0..100) < 5;
            let class = if (x > 4.0) ^ noisy { 1.0 } else { 0.0 };
            row(h, vec![x, colour, class])
        })
        .collect()
}

#[test]
fn entropy_stays_within_bounds() {
    let mut rng = StdRng::seed_from_u64(7);
    for k in 1..6 {
        for _ in 0..50 {
            let weights: Vec<f64> = (0..k)
                .map(|_| if rng.random_bool(0.3) { 0.0 } else { rng.random_range(0.0..10.0) })
                .collect();
            let d = ClassDistribution::from_weights(weights.clone()).unwrap();
            let e = d.entropy();
            assert!(e >= -EPS, "{weights:?} -> {e}");
            assert!(e <= (k as f64).log2() + EPS, "{weights:?} -> {e}");
            let non_zero = weights.iter().filter(|w| **w > 0.0).count();
            assert_eq!(e.abs() < EPS, non_zero <= 1, "{weights:?} -> {e}");
        }
    }
}

#[test]
fn hoeffding_bound_shrinks_with_evidence_and_looser_confidence() {
    let mut prev = f64::INFINITY;
    for n in [1.0, 2.0, 10.0, 200.0, 5_000.0] {
        let b = compute_hoeffding_bound(1.0, 1e-7, n);
        assert!(b <= prev);
        prev = b;
    }
    let mut prev = f64::INFINITY;
    for confidence in [1e-9, 1e-7, 1e-3, 0.05, 0.5] {
        let b = compute_hoeffding_bound(1.0, confidence, 200.0);
        assert!(b <= prev);
        prev = b;
    }
}

#[test]
fn fewer_rows_than_grace_period_never_split() {
    let h = mixed_header();
    let mut tree = fresh_tree(HoeffdingTreeConfig::default(), &h);
    for r in random_rows(&h, 3, 199) {
        tree.train_on_instance(&r);
    }
    assert_eq!(tree.decision_node_count(), 0);
    assert_eq!(tree.active_leaf_node_count(), 1);
    assert!(matches!(tree.node(tree.root().unwrap()), Some(Node::Learning(_))));
}

#[test]
fn identical_streams_build_identical_trees() {
    let h = mixed_header();
    let config = HoeffdingTreeConfig::default().with_grace_period(50);
    let mut a = fresh_tree(config.clone(), &h);
    let mut b = fresh_tree(config, &h);
    for r in random_rows(&h, 2024, 3_000) {
        a.train_on_instance(&r);
    }
    for r in random_rows(&h, 2024, 3_000) {
        b.train_on_instance(&r);
    }

    assert!(a.decision_node_count() > 0);
    assert_eq!(a.describe_tree(), b.describe_tree());
    assert_eq!(a.node_count(), b.node_count());
    assert_eq!(a.tree_depth(), b.tree_depth());
    for held_out in random_rows(&h, 99, 200) {
        assert_eq!(a.predict(&held_out), b.predict(&held_out));
        assert_eq!(
            a.get_votes_for_instance(&held_out),
            b.get_votes_for_instance(&held_out)
        );
    }
}

#[test]
fn single_row_of_a_predicts_a() {
    let h = numeric_header();
    let mut tree = fresh_tree(HoeffdingTreeConfig::default(), &h);
    tree.train_on_instance(&row(&h, vec![5.0, 0.0]));
    for x in [-100.0, 0.0, 5.0, 42.0, f64::NAN] {
        assert_eq!(tree.predict(&row(&h, vec![x, f64::NAN])), 0);
    }
}

#[test]
fn nominal_concept_splits_and_routes_consistently() {
    let h = nominal_header();
    let mut tree = fresh_tree(HoeffdingTreeConfig::default().with_grace_period(50), &h);
    for _ in 0..100 {
        tree.train_on_instance(&row(&h, vec![0.0, 0.0]));
        tree.train_on_instance(&row(&h, vec![1.0, 1.0]));
    }

    assert_eq!(tree.decision_node_count(), 1);
    let root = tree.root().unwrap();
    assert!(matches!(tree.node(root), Some(Node::Split(_))));
    assert_eq!(tree.predict(&row(&h, vec![0.0, f64::NAN])), 0);
    assert_eq!(tree.predict(&row(&h, vec![1.0, f64::NAN])), 1);

    let x_row = row(&h, vec![0.0, 0.0]);
    let first = tree.filter_instance_to_leaf(&x_row);
    tree.train_on_instance(&x_row);
    let second = tree.filter_instance_to_leaf(&x_row);
    assert_eq!(first.node, second.node);
    assert_eq!(first.parent_branch.map(|pb| pb.branch), Some(0));
    assert_eq!(second.parent_branch.map(|pb| (pb.parent, pb.branch)), Some((root, 0)));

    let text = tree.describe_tree();
    assert!(text.contains("if att = x:"), "{text}");
    assert!(text.contains("if att = y:"), "{text}");
}

#[test]
fn near_empty_branch_has_no_merit() {
    let criterion = InfoGainSplitCriterion::new(0.01);
    let pre = ClassDistribution::from_weights(vec![50.0, 50.0]).unwrap();
    let heavy = ClassDistribution::from_weights(vec![49.5, 49.5]).unwrap();
    let light = ClassDistribution::from_weights(vec![0.5, 0.5]).unwrap();
    let merit = criterion.get_merit_of_split(&pre, &[heavy, light]);
    assert_eq!(merit, f64::NEG_INFINITY);

    let left = ClassDistribution::from_weights(vec![50.0, 0.0]).unwrap();
    let right = ClassDistribution::from_weights(vec![0.0, 50.0]).unwrap();
    let merit = criterion.get_merit_of_split(&pre, &[left, right]);
    assert!((merit - 1.0).abs() < EPS);
}
