use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use trie_encodings::bit_vectors::{Louds, RankedBitArray};
use trie_encodings::prelude::*;
use trie_encodings::tries::LevelStep;
use trie_encodings::{BinaryTrie, LabelledTree, Trie};

fn words_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(b'a'..=b'e', 0..8), 0..40)
}

fn gen_random_words(len: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let n = rng.gen_range(1..=16);
            (0..n).map(|_| rng.gen_range(0..u8::MAX)).collect()
        })
        .collect()
}

fn build_all(words: &[Vec<u8>]) -> (Trie, BinaryTrie, LabelledTree) {
    let trie = Trie::create(words);
    let binary = BinaryTrie::create(&trie).unwrap();
    let succinct = LabelledTree::create(&trie);
    (trie, binary, succinct)
}

proptest! {
    #[test]
    fn test_round_trip(words in words_strategy(), probes in words_strategy()) {
        let (trie, binary, succinct) = build_all(&words);

        let trie = Trie::from_bytes(&trie.to_bytes().unwrap()).unwrap();
        let binary = BinaryTrie::from_bytes(&binary.to_bytes().unwrap()).unwrap();
        let succinct = LabelledTree::from_bytes(&succinct.to_bytes().unwrap()).unwrap();

        for w in &words {
            prop_assert!(trie.search(w));
            prop_assert!(binary.search(w));
            prop_assert!(succinct.search(w));
        }
        for p in probes.iter().filter(|p| !words.contains(p)) {
            prop_assert!(!trie.search(p));
            prop_assert!(!binary.search(p));
            prop_assert!(!succinct.search(p));
        }
    }

    #[test]
    fn test_cross_representation(words in words_strategy(), probes in words_strategy()) {
        let (trie, binary, succinct) = build_all(&words);
        let prefixes = words.iter().flat_map(|w| (0..=w.len()).map(move |i| &w[..i]));
        for p in probes.iter().map(|p| &p[..]).chain(prefixes) {
            let expected = trie.search(p);
            prop_assert_eq!(binary.search(p), expected);
            prop_assert_eq!(succinct.search(p), expected);
            let expected = trie.starts_with(p);
            prop_assert_eq!(binary.starts_with(p), expected);
            prop_assert_eq!(succinct.starts_with(p), expected);
        }
    }

    #[test]
    fn test_idempotent_construction(words in words_strategy()) {
        let trie = Trie::create(&words);
        prop_assert_eq!(
            BinaryTrie::create(&trie).unwrap().into_data(),
            BinaryTrie::create(&trie).unwrap().into_data()
        );
        prop_assert_eq!(
            LabelledTree::create(&trie).to_bytes().unwrap(),
            LabelledTree::create(&trie).to_bytes().unwrap()
        );
        prop_assert_eq!(trie.to_bytes().unwrap(), trie.to_bytes().unwrap());
    }

    #[test]
    fn test_insertion_order_does_not_matter(mut words in words_strategy()) {
        let forward = Trie::create(&words);
        words.reverse();
        let backward = Trie::create(&words);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.to_bytes().unwrap(), backward.to_bytes().unwrap());
        prop_assert_eq!(
            BinaryTrie::create(&forward).unwrap(),
            BinaryTrie::create(&backward).unwrap()
        );
    }

    #[test]
    fn test_rank_select_consistency(bits in prop::collection::vec(any::<bool>(), 0..500)) {
        let bv = RankedBitArray::from_bits(bits.iter().cloned());
        prop_assert_eq!(bv.rank1(0), Some(0));
        let mut prev = 0;
        for i in 0..=bits.len() {
            let r = bv.rank1(i).unwrap();
            prop_assert!(prev <= r);
            prev = r;
        }
        for k in 1..=bv.num_zeros() {
            let pos = bv.select0(k).unwrap();
            prop_assert!(!bits[pos]);
            prop_assert_eq!(bv.rank0(pos + 1), Some(k));
        }
        prop_assert_eq!(bv.select0(bv.num_zeros() + 1), None);
        for k in 1..=bv.num_ones() {
            let pos = bv.select1(k).unwrap();
            prop_assert_eq!(bv.rank1(pos + 1), Some(k));
        }
    }

    #[test]
    fn test_louds_structural_fidelity(words in words_strategy()) {
        let trie = Trie::create(&words);
        let tree = LabelledTree::create(&trie);
        let louds = tree.louds();
        prop_assert_eq!(louds.num_bits(), 2 * trie.num_nodes() + 1);

        let mut order = vec![Trie::ROOT];
        order.extend(trie.level_order().filter_map(|step| match step {
            LevelStep::Child { node, .. } => Some(node),
            LevelStep::Close => None,
        }));
        for (i, &id) in order.iter().enumerate() {
            let pos = louds.node_position(i + 1).unwrap();
            let mut keys = vec![];
            let mut child = louds.first_child(pos).unwrap();
            while louds.is_node(child) {
                keys.push(tree.keys()[louds.node_index(child).unwrap() - 2]);
                child += 1;
            }
            let expected: Vec<u8> = trie.node(id).unwrap().children().iter().map(|&(k, _)| k).collect();
            prop_assert_eq!(keys, expected);
        }
    }
}

#[test]
fn test_scenario_a() {
    let (trie, binary, succinct) = build_all(&[
        b"hello".to_vec(),
        b"hey".to_vec(),
        b"world".to_vec(),
    ]);
    for (word, expected) in [("hello", true), ("he", false), ("another", false)] {
        assert_eq!(trie.search(word), expected);
        assert_eq!(binary.search(word), expected);
        assert_eq!(succinct.search(word), expected);
    }
    assert!(trie.starts_with("he"));
    assert!(binary.starts_with("he"));
    assert!(succinct.starts_with("he"));
}

#[test]
fn test_scenario_b() {
    let trie = Trie::create(["ab", "c"]);
    let bytes = trie.to_bytes().unwrap();
    assert_eq!(
        bytes,
        [0, 0, 0, 23, 0, b'a', 0, 0, 0, 11, 0, b'b', 0, 0, 0, 5, 1, b'c', 0, 0, 0, 5, 1]
    );
    assert_eq!(Trie::from_bytes(&bytes).unwrap(), trie);
}

#[test]
fn test_build_trait() {
    let words = ["to", "tea", "ted", "ten", "i", "in", "inn"];
    let trie = Trie::build_from_words(words).unwrap();
    let binary = BinaryTrie::build_from_words(words).unwrap();
    let succinct = LabelledTree::build_from_words(words).unwrap();
    assert_eq!(binary, BinaryTrie::create(&trie).unwrap());
    assert_eq!(succinct, LabelledTree::create(&trie));
    assert!(succinct.search("inn"));
    assert!(!succinct.search("te"));
}

#[test]
fn test_code_units() {
    let word = trie_encodings::utils::code_units("caf\u{e9}").unwrap();
    let trie = Trie::create([&word]);
    assert!(LabelledTree::create(&trie).search(&word));
    assert!(!trie.search("caf\u{e9}"));
}

#[test]
fn test_random_byte_words() {
    for seed in 0..5 {
        let words = gen_random_words(2000, seed);
        let (trie, binary, succinct) = build_all(&words);
        let louds = Louds::from_trie(&trie);
        assert_eq!(&louds, succinct.louds());
        for w in &words {
            assert!(binary.search(w));
            assert!(succinct.search(w));
            let half = &w[..w.len() / 2];
            assert_eq!(binary.search(half), trie.search(half));
            assert_eq!(succinct.search(half), trie.search(half));
        }
    }
}
