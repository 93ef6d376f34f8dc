use pretty_assertions::assert_eq;
use rooftop::level::SeededRandom;
use speculoos::prelude::*;

#[test]
fn test_first_values_match_hash() {
    let mut random = SeededRandom::new();
    let expected = [0.104_682_425_5, 0.800_107_082_4, 0.629_702_174_7];

    for value in expected {
        assert_that(&(random.next_unit() - value).abs()).is_less_than(1e-6);
    }
}

#[test]
fn test_fresh_instances_replay() {
    let a: Vec<f64> = SeededRandom::new().take(500).collect();
    let b: Vec<f64> = SeededRandom::new().take(500).collect();
    assert_eq!(a, b);
}

#[test]
fn test_values_in_unit_range() {
    for value in SeededRandom::new().take(5_000) {
        assert_that(&(0.0..1.0).contains(&value)).is_true();
    }
}

#[test]
fn test_with_counter_skips_ahead() {
    let mut skipped = SeededRandom::with_counter(10);
    let mut walked = SeededRandom::new();
    for _ in 0..10 {
        walked.next_unit();
    }

    assert_that(&skipped.next_unit()).is_equal_to(walked.next_unit());
    assert_that(&skipped.counter()).is_equal_to(11);
}
