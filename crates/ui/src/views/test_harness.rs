use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use quiz_core::model::{
    AttemptId, LoadedQuiz, OptionId, Question, QuestionOption, QuestionId, Quiz, QuizId,
};
use services::{
    AppServices, BackendError, QuizBackend, QuizSource, SubmissionReceipt, SubmissionRequest,
};

use crate::context::{UiApp, build_app_context};
use crate::platform::{LinkOpenerRef, UiLinkOpener};
use crate::views::{SubmittedView, TakeQuizView};

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UiLinkOpener for RecordingOpener {
    fn open_url(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

pub struct StubBackend {
    loaded: Option<LoadedQuiz>,
}

#[async_trait]
impl QuizBackend for StubBackend {
    async fn load_quiz(
        &self,
        _quiz_id: QuizId,
        _source: QuizSource,
    ) -> Result<LoadedQuiz, BackendError> {
        self.loaded
            .clone()
            .ok_or(BackendError::MissingPageData("quiz questions"))
    }

    async fn submit(
        &self,
        _quiz_id: QuizId,
        _request: &SubmissionRequest,
    ) -> Result<SubmissionReceipt, BackendError> {
        Err(BackendError::MissingCsrfToken)
    }

    fn result_url(&self, attempt_id: AttemptId) -> String {
        format!("http://quiz.test/quiz/student/attempt/{attempt_id}/result/")
    }
}

pub fn sample_quiz() -> LoadedQuiz {
    let questions = vec![
        Question::new(
            QuestionId::new(1),
            "Capital of France?",
            2,
            vec![
                QuestionOption::new(OptionId::new(0), "Paris"),
                QuestionOption::new(OptionId::new(1), "Rome"),
            ],
        )
        .unwrap(),
        Question::new(
            QuestionId::new(2),
            "",
            1,
            vec![QuestionOption::new(OptionId::new(0), "Yes")],
        )
        .unwrap(),
    ];
    LoadedQuiz::fresh(Quiz::new(QuizId::new(5), "Geography", 10, questions).unwrap())
}

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    opener: Arc<RecordingOpener>,
}

impl UiApp for TestApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        self.opener.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    TakeQuiz,
    Submitted(u64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    match use_context::<ViewKind>() {
        ViewKind::TakeQuiz => rsx! { TakeQuizView {} },
        ViewKind::Submitted(attempt_id) => rsx! { SubmittedView { attempt_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub opener: Arc<RecordingOpener>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, loaded: Option<LoadedQuiz>) -> ViewHarness {
    let backend = Arc::new(StubBackend { loaded });
    let opener = Arc::new(RecordingOpener::default());
    let app = Arc::new(TestApp {
        services: AppServices::with_backend(backend, QuizId::new(5), QuizSource::Api),
        opener: Arc::clone(&opener),
    });
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom, opener }
}
