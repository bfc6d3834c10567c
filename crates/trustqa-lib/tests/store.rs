use trustqa_lib::store::{
    InMemoryStore, ListScope, NewSuggestion, ReviewStore, StoreError, provision_instance,
};
use trustqa_spec::spec::question::{ItemType, Question, QuestionOption};
use trustqa_spec::spec::suggestion::SuggestionStatus;
use trustqa_spec::validate::{BatchError, UploadLimits};

fn radio(id: &str) -> Question {
    Question {
        id: id.to_string(),
        section: "General".to_string(),
        page: "Page 1".to_string(),
        item_type: Some(ItemType::Radio),
        question_text: format!("Question {id}"),
        options: vec![
            QuestionOption {
                value: "Yes".to_string(),
                characteristic: None,
            },
            QuestionOption {
                value: "No".to_string(),
                characteristic: None,
            },
        ],
        characteristic: None,
        required: false,
        enable_when: None,
        has_helper: false,
        helper_type: None,
        helper_name: None,
        helper_value: None,
    }
}

fn suggestion_for(question_ref: &str) -> NewSuggestion {
    NewSuggestion {
        question_ref: question_ref.to_string(),
        submitter_name: "A. Reviewer".to_string(),
        submitter_email: None,
        suggestion_text: "make it required".to_string(),
        reason: "triage needs it".to_string(),
        component_changes: None,
    }
}

#[test]
fn provisioning_copies_the_master_questions() {
    let mut store = InMemoryStore::new();
    let master_id = store
        .create_questionnaire("Master", vec![radio("Q1"), radio("Q2")])
        .unwrap();

    let instance_id =
        provision_instance(&mut store, &master_id, "North Trust", &UploadLimits::INSTANCE)
            .unwrap();

    let copied = store.questionnaire_questions(&instance_id).unwrap();
    assert_eq!(copied.len(), 2);
    assert_eq!(store.master_of(&instance_id), Some(master_id.as_str()));
    assert_eq!(store.questionnaire_name(&instance_id), Some("North Trust"));
}

#[test]
fn failed_provisioning_rolls_back_the_instance_shell() {
    let mut store = InMemoryStore::new();
    // An empty master fails instance validation after the shell exists.
    let master_id = store.create_questionnaire("Master", Vec::new()).unwrap();

    let result = provision_instance(&mut store, &master_id, "North Trust", &UploadLimits::INSTANCE);

    assert!(matches!(
        result,
        Err(StoreError::RejectedBatch(BatchError::EmptyBatch))
    ));
    // Only the master remains; the half-created instance is gone.
    assert_eq!(store.questionnaire_count(), 1);
}

#[test]
fn provisioning_an_unknown_master_fails_without_side_effects() {
    let mut store = InMemoryStore::new();

    let result = provision_instance(&mut store, "missing", "North Trust", &UploadLimits::INSTANCE);

    assert!(matches!(result, Err(StoreError::QuestionnaireNotFound(_))));
    assert_eq!(store.questionnaire_count(), 0);
}

#[test]
fn new_suggestions_start_pending_with_timestamps() {
    let mut store = InMemoryStore::new();

    let id = store.create_suggestion(suggestion_for("Q1")).unwrap();

    let listed = store.list_suggestions(&ListScope::All).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(listed[0].status, SuggestionStatus::Pending);
    assert!(!listed[0].created_at.is_empty());
    assert_eq!(listed[0].created_at, listed[0].updated_at);
}

#[test]
fn listings_filter_by_question_and_status() {
    let mut store = InMemoryStore::new();
    let first = store.create_suggestion(suggestion_for("Q1")).unwrap();
    store.create_suggestion(suggestion_for("Q2")).unwrap();
    store
        .update_suggestion_status(&first, SuggestionStatus::Approved, Some("accepted"))
        .unwrap();

    let by_question = store
        .list_suggestions(&ListScope::Question("Q1".to_string()))
        .unwrap();
    assert_eq!(by_question.len(), 1);
    assert_eq!(by_question[0].question_ref, "Q1");

    let approved = store
        .list_suggestions(&ListScope::Status(SuggestionStatus::Approved))
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].response_message.as_deref(), Some("accepted"));

    let pending = store
        .list_suggestions(&ListScope::Status(SuggestionStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].question_ref, "Q2");
}

#[test]
fn status_updates_on_unknown_suggestions_fail() {
    let mut store = InMemoryStore::new();

    let result = store.update_suggestion_status("missing", SuggestionStatus::Rejected, None);

    assert!(matches!(result, Err(StoreError::SuggestionNotFound(_))));
}

#[test]
fn comments_thread_in_insertion_order() {
    let mut store = InMemoryStore::new();
    let id = store.create_suggestion(suggestion_for("Q1")).unwrap();

    store.add_comment(&id, "reviewer", "looks sensible").unwrap();
    store.add_comment(&id, "admin", "approved, thanks").unwrap();

    let thread = store.comments(&id).unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].author, "reviewer");
    assert_eq!(thread[1].message, "approved, thanks");

    assert!(matches!(
        store.comments("missing"),
        Err(StoreError::SuggestionNotFound(_))
    ));
}
