use golem_geom::{Mat3, Vec3};
use golem_symmetry::{
    GROUP_ORDER, IDENTITY, codes, compose, decode, encode, is_valid, matrix, rot_z,
};
use proptest::prelude::*;

fn is_signed_permutation(m: &Mat3) -> bool {
    let mut row_hits = [0u8; 3];
    for j in 0..3 {
        let c = m.col(j);
        let entries = [c.x, c.y, c.z];
        let mut nonzero = 0;
        for (i, e) in entries.iter().enumerate() {
            if e.abs() > 0.5 {
                if (e.abs() - 1.0).abs() > 1e-6 {
                    return false;
                }
                row_hits[i] += 1;
                nonzero += 1;
            } else if e.abs() > 1e-6 {
                return false;
            }
        }
        if nonzero != 1 {
            return false;
        }
    }
    row_hits == [1, 1, 1]
}

#[test]
fn every_valid_code_round_trips() {
    let mut seen = std::collections::HashSet::new();
    for c in codes() {
        let m = decode(c).unwrap();
        assert!(is_signed_permutation(&m), "code {} decoded badly", c);
        assert_eq!(encode(&m), Some(c));
        // Distinct codes decode to distinct matrices
        let key: Vec<i32> = (0..3)
            .flat_map(|j| {
                let col = m.col(j);
                [col.x as i32, col.y as i32, col.z as i32]
            })
            .collect();
        assert!(seen.insert(key), "code {} duplicates another matrix", c);
    }
    assert_eq!(seen.len(), GROUP_ORDER);
}

#[test]
fn composition_is_closed_and_matches_matrix_product() {
    for a in codes() {
        for b in codes() {
            let c = compose(a, b).expect("product of symmetries is a symmetry");
            assert!(is_valid(c));
            let expect = decode(a).unwrap() * decode(b).unwrap();
            assert_eq!(decode(c).unwrap(), expect);
        }
    }
}

#[test]
fn identity_is_neutral_element() {
    for c in codes() {
        assert_eq!(compose(IDENTITY, c), Some(c));
        assert_eq!(compose(c, IDENTITY), Some(c));
    }
}

#[test]
fn z_rotations_behave_like_a_cyclic_group() {
    assert_eq!(rot_z(0), IDENTITY);
    let quarter = rot_z(1);
    assert_eq!(compose(quarter, quarter), Some(rot_z(2)));
    assert_eq!(compose(rot_z(2), quarter), Some(rot_z(3)));
    assert_eq!(compose(rot_z(3), quarter), Some(IDENTITY));
    // k wraps modulo 4
    assert_eq!(rot_z(5), quarter);

    // The quarter turn maps X to Y and fixes Z
    let m = matrix(quarter).unwrap();
    assert_eq!(*m * Vec3::X, Vec3::Y);
    assert_eq!(*m * Vec3::Z, Vec3::Z);
}

#[test]
fn table_agrees_with_decode() {
    for c in 0..=255u8 {
        match (matrix(c), decode(c)) {
            (Some(t), Some(d)) => assert_eq!(*t, d),
            (None, None) => {}
            _ => panic!("table and decode disagree for code {}", c),
        }
    }
}

#[test]
fn encode_rejects_non_permutations() {
    assert_eq!(encode(&Mat3::ZERO), None);
    // Two columns on the same axis
    let m = Mat3::from_cols(Vec3::X, Vec3::X, Vec3::Z);
    assert_eq!(encode(&m), None);
    // A rotation off the axis grid
    let m = Mat3::rotation_z(0.3);
    assert_eq!(encode(&m), None);
}

proptest! {
    // Composition with a fixed element permutes the group (no collisions)
    #[test]
    fn left_translation_is_injective(a in 0u8..64) {
        prop_assume!(is_valid(a));
        let mut seen = std::collections::HashSet::new();
        for b in codes() {
            let c = compose(a, b).unwrap();
            prop_assert!(seen.insert(c));
        }
        prop_assert_eq!(seen.len(), GROUP_ORDER);
    }

    // Every element has an inverse within the group
    #[test]
    fn inverses_exist(a in 0u8..64) {
        prop_assume!(is_valid(a));
        let inv = codes().find(|&b| compose(a, b) == Some(IDENTITY));
        prop_assert!(inv.is_some());
        // Transpose of a signed permutation is its inverse
        let m = decode(a).unwrap();
        prop_assert_eq!(encode(&m.transpose()), inv);
    }
}
