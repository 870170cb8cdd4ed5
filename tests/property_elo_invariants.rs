use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;

use quiz_backend::quiz::config::EloConfig;
use quiz_backend::quiz::elo::{expected_score, score_answer};
use quiz_backend::quiz::engine::QuizEngine;
use quiz_backend::quiz::types::AnswerSubmission;
use quiz_backend::store::keys::sortable_rating;
use quiz_backend::store::operations::questions::Question;
use quiz_backend::store::Store;

fn config_with_k(student_k: f64, question_k: f64) -> EloConfig {
    EloConfig {
        student_k_factor: student_k,
        question_k_factor: question_k,
        ..EloConfig::default()
    }
}

proptest! {
    #[test]
    fn pt_equal_ratings_expect_half(r in -5000.0_f64..5000.0) {
        prop_assert!((expected_score(r, r) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pt_expectations_are_complementary(a in -3000.0_f64..3000.0, b in -3000.0_f64..3000.0) {
        let sum = expected_score(a, b) + expected_score(b, a);
        prop_assert!((sum - 1.0).abs() < 1e-9);
        let e = expected_score(a, b);
        prop_assert!(e > 0.0 && e < 1.0);
    }

    #[test]
    fn pt_correct_raises_student_and_lowers_question(
        s in 0.0_f64..3000.0,
        q in 0.0_f64..3000.0,
        k in 1.0_f64..64.0,
    ) {
        let ex = score_answer(s, q, true, &config_with_k(k, k));
        prop_assert!(ex.student_post > s);
        prop_assert!(ex.question_post < q);
        // 等 K 时评分守恒
        prop_assert!(((ex.student_post - s) + (ex.question_post - q)).abs() < 1e-9);
    }

    #[test]
    fn pt_incorrect_lowers_student_and_raises_question(
        s in 0.0_f64..3000.0,
        q in 0.0_f64..3000.0,
        k in 1.0_f64..64.0,
    ) {
        let ex = score_answer(s, q, false, &config_with_k(k, k));
        prop_assert!(ex.student_post < s);
        prop_assert!(ex.question_post > q);
    }

    #[test]
    fn pt_delta_scales_linearly_with_k(
        s in 0.0_f64..3000.0,
        q in 0.0_f64..3000.0,
        correct in any::<bool>(),
    ) {
        let base = score_answer(s, q, correct, &config_with_k(16.0, 16.0));
        let doubled = score_answer(s, q, correct, &config_with_k(32.0, 32.0));
        let d1 = base.student_post - s;
        let d2 = doubled.student_post - s;
        prop_assert!((d2 - 2.0 * d1).abs() < 1e-9);
    }

    #[test]
    fn pt_upset_moves_more_than_expected_win(
        s in 800.0_f64..1200.0,
        gap in 1.0_f64..800.0,
    ) {
        let cfg = EloConfig::default();
        // 答对更难的题比答对更简单的题涨分更多
        let hard = score_answer(s, s + gap, true, &cfg);
        let easy = score_answer(s, s - gap, true, &cfg);
        prop_assert!(hard.student_post - s > easy.student_post - s);
    }

    #[test]
    fn pt_sortable_rating_preserves_order(a in -1.0e6_f64..1.0e6, b in -1.0e6_f64..1.0e6) {
        let ka = sortable_rating(a);
        let kb = sortable_rating(b);
        prop_assert_eq!(a.partial_cmp(&b), Some(ka.cmp(&kb)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn pt_engine_persists_exchange_it_returns(
        student_rating in 500.0_f64..1500.0,
        question_rating in 500.0_f64..1500.0,
        chosen in 0_i32..4,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(dir.path().join("pt.sled").to_str().unwrap()).unwrap());
        store.set_student_rating("s1", student_rating).unwrap();
        store
            .insert_question(&Question {
                id: "q1".to_string(),
                stem: "stem".to_string(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 1,
                difficulty_rating: question_rating,
                topic_id: "t1".to_string(),
                created_at: Utc::now(),
            })
            .unwrap();
        let engine = QuizEngine::new(EloConfig::default(), store.clone());

        let outcome = tokio_test::block_on(engine.submit_answer(AnswerSubmission {
            student_id: "s1".to_string(),
            question_id: "q1".to_string(),
            chosen_index: chosen,
            time_taken_ms: 100,
        }))
        .unwrap();

        let expected = score_answer(student_rating, question_rating, chosen == 1, &EloConfig::default());
        prop_assert_eq!(outcome.correct, chosen == 1);
        prop_assert!((outcome.new_student_rating - expected.student_post).abs() < 1e-9);
        prop_assert!((outcome.question_rating - expected.question_post).abs() < 1e-9);

        let stored_student = store.get_student("s1").unwrap().unwrap().rating;
        let stored_question = store.get_question("q1").unwrap().unwrap().difficulty_rating;
        prop_assert!((stored_student - outcome.new_student_rating).abs() < 1e-9);
        prop_assert!((stored_question - outcome.question_rating).abs() < 1e-9);

        let attempts = store.list_student_attempts("s1", 10).unwrap();
        prop_assert_eq!(attempts.len(), 1);
        prop_assert!((attempts[0].student_rating_pre - student_rating).abs() < 1e-9);
        prop_assert!((attempts[0].question_rating_pre - question_rating).abs() < 1e-9);
    }
}
