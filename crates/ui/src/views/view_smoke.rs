use quiz_core::model::{LoadedQuiz, Question, QuestionId, Quiz, QuizId};

use super::test_harness::{ViewKind, sample_quiz, setup_view_harness};

#[tokio::test(flavor = "current_thread")]
async fn take_quiz_view_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::TakeQuiz, Some(sample_quiz()));
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }

    let html = harness.render();
    for expected in [
        "Geography",
        "Question 1",
        "2 Marks",
        "Capital of France?",
        "1 of 2",
        "Paris",
        "10:00",
        "Submit Quiz",
    ] {
        assert!(html.contains(expected), "missing {expected} in {html}");
    }
    assert!(html.contains("grid-cell current"), "missing current cell in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn question_without_options_shows_empty_state() {
    let open_ended = Question::new(QuestionId::new(1), "Describe a river", 1, Vec::new()).unwrap();
    let quiz = Quiz::new(QuizId::new(5), "Geography", 10, vec![open_ended]).unwrap();
    let mut harness = setup_view_harness(ViewKind::TakeQuiz, Some(LoadedQuiz::fresh(quiz)));
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(
        html.contains("No options available for this question"),
        "missing empty state in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn take_quiz_view_reports_missing_quiz_data() {
    let mut harness = setup_view_harness(ViewKind::TakeQuiz, None);
    harness.rebuild();
    for _ in 0..4 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(
        html.contains("Error loading quiz questions"),
        "missing load error in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn submitted_view_links_to_results() {
    let mut harness = setup_view_harness(ViewKind::Submitted(812), None);
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Quiz submitted"), "missing heading in {html}");
    assert!(
        html.contains("http://quiz.test/quiz/student/attempt/812/result/"),
        "missing result url in {html}"
    );
    assert!(harness.opener.opened.lock().unwrap().is_empty());
}
