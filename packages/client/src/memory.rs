// ABOUTME: In-memory record backend and generation API for tests
// ABOUTME: Counts calls per operation, supports artificial latency and one-shot failures

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use storyloom_core::{
    FieldError, RecordList, TestCase, UserStory, PROJECT_COLLECTION, TEST_CASE_COLLECTION,
    USERS_COLLECTION, USER_STORY_COLLECTION,
};

use crate::error::{ClientError, ClientResult};
use crate::form::FormPayload;
use crate::generation::GenerationApi;
use crate::record::{AuthRecord, ListOptions, RecordClient};
use crate::session::Session;

const TIMESTAMP: &str = "2024-01-01 00:00:00.000Z";
const NOT_FOUND_MESSAGE: &str = "The requested resource wasn't found.";

/// Child collection, reference field, parent collection. Deletes cascade along these.
const RELATIONS: [(&str, &str, &str); 3] = [
    (PROJECT_COLLECTION, "user", USERS_COLLECTION),
    (USER_STORY_COLLECTION, "project", PROJECT_COLLECTION),
    (TEST_CASE_COLLECTION, "user_story", USER_STORY_COLLECTION),
];

#[derive(Default)]
struct BackendState {
    next_id: u64,
    collections: HashMap<String, Vec<Map<String, Value>>>,
    passwords: HashMap<String, String>,
    tokens: HashMap<String, String>,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{:012}", prefix, self.next_id)
    }

    fn records(&self, collection: &str) -> &[Map<String, Value>] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn find(&self, collection: &str, id: &str) -> Option<&Map<String, Value>> {
        self.records(collection)
            .iter()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
    }

    fn find_mut(&mut self, collection: &str, id: &str) -> Option<&mut Map<String, Value>> {
        self.collections.get_mut(collection).and_then(|records| {
            records
                .iter_mut()
                .find(|record| record.get("id").and_then(Value::as_str) == Some(id))
        })
    }

    fn insert(&mut self, collection: &str, record: Map<String, Value>) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    /// Remove a record and everything that references it
    fn remove_cascading(&mut self, collection: &str, id: &str) {
        if let Some(records) = self.collections.get_mut(collection) {
            records.retain(|record| record.get("id").and_then(Value::as_str) != Some(id));
        }
        for (child, field, parent) in RELATIONS {
            if parent != collection {
                continue;
            }
            let child_ids: Vec<String> = self
                .records(child)
                .iter()
                .filter(|record| record.get(field).and_then(Value::as_str) == Some(id))
                .filter_map(|record| record.get("id").and_then(Value::as_str).map(String::from))
                .collect();
            for child_id in child_ids {
                self.remove_cascading(child, &child_id);
            }
        }
    }

    fn new_record(&mut self, prefix: &str, fields: Map<String, Value>) -> Map<String, Value> {
        let mut record = fields;
        record.insert("id".to_string(), Value::String(self.next_id(prefix)));
        record.insert("created".to_string(), Value::String(TIMESTAMP.to_string()));
        record.insert("updated".to_string(), Value::String(TIMESTAMP.to_string()));
        record
    }
}

struct Inner {
    session: Session,
    state: Mutex<BackendState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failures: Mutex<HashMap<&'static str, ClientError>>,
    latency: Mutex<Option<Duration>>,
    stories_per_document: usize,
    cases_per_story: usize,
}

/// Record backend and generation API held entirely in memory.
///
/// Shares the caller's session so that requests carry the same token a real
/// client would send.
#[derive(Clone)]
pub struct InMemoryBackend {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn validation(field: &str, message: &str) -> ClientError {
    ClientError::Validation {
        message: "Failed to process the request.".to_string(),
        details: vec![FieldError::new(field, message, "validation_invalid")],
    }
}

fn decode<T: DeserializeOwned>(record: Map<String, Value>) -> ClientResult<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

impl InMemoryBackend {
    pub fn new(session: Session) -> Self {
        Self::with_generation_sizes(session, 3, 2)
    }

    /// Number of stories generated per document and test cases per story
    pub fn with_generation_sizes(session: Session, stories: usize, cases: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                session,
                state: Mutex::new(BackendState::default()),
                calls: Mutex::new(HashMap::new()),
                failures: Mutex::new(HashMap::new()),
                latency: Mutex::new(None),
                stories_per_document: stories,
                cases_per_story: cases,
            }),
        }
    }

    /// Delay every operation by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.inner.latency) = Some(latency);
    }

    /// Make the next call to `operation` fail with `error`
    pub fn fail_next(&self, operation: &'static str, error: ClientError) {
        lock(&self.inner.failures).insert(operation, error);
    }

    /// Number of calls made to `operation` (for example `"list"`)
    pub fn calls(&self, operation: &str) -> usize {
        lock(&self.inner.calls).get(operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.inner.calls).values().sum()
    }

    pub fn reset_calls(&self) {
        lock(&self.inner.calls).clear();
    }

    /// Register an account directly, bypassing the API
    pub fn add_user(&self, email: &str, password: &str, name: Option<&str>) -> String {
        let mut state = lock(&self.inner.state);
        let mut fields = Map::new();
        fields.insert("email".to_string(), Value::String(email.to_string()));
        if let Some(name) = name {
            fields.insert("name".to_string(), Value::String(name.to_string()));
        }
        fields.insert("verified".to_string(), Value::Bool(true));
        let record = state.new_record("u", fields);
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        state.passwords.insert(email.to_string(), password.to_string());
        state.insert(USERS_COLLECTION, record);
        id
    }

    /// Issue a valid token for an existing user without a login call
    pub fn issue_token(&self, user_id: &str) -> String {
        Self::mint_token(&mut lock(&self.inner.state), user_id)
    }

    /// Number of records currently stored in a collection
    pub fn count(&self, collection: &str) -> usize {
        lock(&self.inner.state).records(collection).len()
    }

    /// Raw copy of a stored record
    pub fn record(&self, collection: &str, id: &str) -> Option<Value> {
        lock(&self.inner.state)
            .find(collection, id)
            .cloned()
            .map(Value::Object)
    }

    async fn enter(&self, operation: &'static str) -> ClientResult<()> {
        *lock(&self.inner.calls).entry(operation).or_insert(0) += 1;
        let latency = *lock(&self.inner.latency);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match lock(&self.inner.failures).remove(operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Resolve the session token to a user id
    fn authorized_user(&self) -> ClientResult<String> {
        let token = self
            .inner
            .session
            .token()
            .ok_or_else(|| ClientError::unauthorized("The request requires valid authorization."))?;
        lock(&self.inner.state)
            .tokens
            .get(&token)
            .cloned()
            .ok_or_else(|| ClientError::unauthorized("The request requires valid authorization."))
    }

    fn mint_token(state: &mut BackendState, user_id: &str) -> String {
        let token = state.next_id("token-");
        state.tokens.insert(token.clone(), user_id.to_string());
        token
    }

    fn check_reference(
        state: &BackendState,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> ClientResult<()> {
        for (child, field, parent) in RELATIONS {
            if child != collection {
                continue;
            }
            if let Some(parent_id) = fields.get(field).and_then(Value::as_str) {
                if state.find(parent, parent_id).is_none() {
                    return Err(validation(field, "Failed to find the referenced record."));
                }
            }
        }
        Ok(())
    }

    fn required_fields(collection: &str) -> &'static [&'static str] {
        match collection {
            PROJECT_COLLECTION => &["user", "brd_document"],
            USER_STORY_COLLECTION => &["title", "project"],
            TEST_CASE_COLLECTION => &["name", "user_story"],
            _ => &[],
        }
    }

    fn create_user(&self, payload: FormPayload) -> ClientResult<Value> {
        let mut fields = payload.to_json();
        let email = fields
            .get("email")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let password = fields
            .remove("password")
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default();
        let confirm = fields
            .remove("passwordConfirm")
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default();

        if email.is_empty() {
            return Err(validation("email", "Cannot be blank."));
        }
        if password.is_empty() || password != confirm {
            return Err(validation("passwordConfirm", "Values don't match."));
        }

        let mut state = lock(&self.inner.state);
        if state.passwords.contains_key(&email) {
            return Err(validation("email", "The email is invalid or already in use."));
        }
        fields.insert("verified".to_string(), Value::Bool(false));
        let record = state.new_record("u", fields);
        state.passwords.insert(email, password);
        state.insert(USERS_COLLECTION, record.clone());
        Ok(Value::Object(record))
    }
}

/// Parse `field = "value"` clauses joined by `&&`, optionally parenthesised
fn parse_filter(filter: &str) -> ClientResult<Vec<(String, String)>> {
    let invalid = || validation("filter", "Invalid filter expression.");
    let mut clauses = Vec::new();
    let mut chars = filter.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || "()&".contains(*c)) {
            chars.next();
        }
        if chars.peek().is_none() {
            break;
        }

        let mut field = String::new();
        while let Some(c) = chars.peek() {
            if c.is_alphanumeric() || *c == '_' || *c == '.' {
                field.push(*c);
                chars.next();
            } else {
                break;
            }
        }
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        if field.is_empty() || chars.next() != Some('=') {
            return Err(invalid());
        }
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        if chars.next() != Some('"') {
            return Err(invalid());
        }

        let mut value = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => value.push(chars.next().ok_or_else(invalid)?),
                '"' => {
                    closed = true;
                    break;
                }
                c => value.push(c),
            }
        }
        if !closed {
            return Err(invalid());
        }
        clauses.push((field, value));
    }

    Ok(clauses)
}

fn matches_clauses(record: &Map<String, Value>, clauses: &[(String, String)]) -> bool {
    clauses.iter().all(|(field, value)| match record.get(field) {
        Some(Value::String(actual)) => actual == value,
        Some(Value::Number(actual)) => actual.to_string() == *value,
        Some(Value::Bool(actual)) => actual.to_string() == *value,
        _ => value.is_empty(),
    })
}

#[async_trait]
impl RecordClient for InMemoryBackend {
    async fn authenticate(
        &self,
        collection: &str,
        identity: &str,
        password: &str,
    ) -> ClientResult<AuthRecord> {
        self.enter("authenticate").await?;
        let mut state = lock(&self.inner.state);
        let failed = || ClientError::Validation {
            message: "Failed to authenticate.".to_string(),
            details: Vec::new(),
        };
        if state.passwords.get(identity).map(String::as_str) != Some(password) {
            return Err(failed());
        }
        let record = state
            .records(collection)
            .iter()
            .find(|record| record.get("email").and_then(Value::as_str) == Some(identity))
            .cloned()
            .ok_or_else(failed)?;
        let user_id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let token = Self::mint_token(&mut state, &user_id);
        Ok(AuthRecord {
            token,
            record: Value::Object(record),
        })
    }

    async fn refresh_auth(&self, collection: &str) -> ClientResult<AuthRecord> {
        self.enter("refresh_auth").await?;
        let user_id = self.authorized_user()?;
        let mut state = lock(&self.inner.state);
        let record = state
            .find(collection, &user_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Missing auth record context.".to_string()))?;
        let token = Self::mint_token(&mut state, &user_id);
        Ok(AuthRecord {
            token,
            record: Value::Object(record),
        })
    }

    async fn list(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        options: &ListOptions,
    ) -> ClientResult<RecordList<Value>> {
        self.enter("list").await?;
        self.authorized_user()?;
        let clauses = match &options.filter {
            Some(filter) => parse_filter(filter.as_str())?,
            None => Vec::new(),
        };

        let state = lock(&self.inner.state);
        let matching: Vec<&Map<String, Value>> = state
            .records(collection)
            .iter()
            .filter(|record| matches_clauses(record, &clauses))
            .collect();

        let page = page.max(1);
        let per_page = per_page.max(1);
        let total_items = matching.len() as u64;
        let total_pages = total_items.div_ceil(per_page as u64);
        let items = matching
            .into_iter()
            .skip(((page - 1) as usize).saturating_mul(per_page as usize))
            .take(per_page as usize)
            .map(|record| Value::Object(record.clone()))
            .collect();

        Ok(RecordList {
            page,
            per_page,
            total_items,
            total_pages,
            items,
        })
    }

    async fn get_one(&self, collection: &str, id: &str) -> ClientResult<Value> {
        self.enter("get_one").await?;
        self.authorized_user()?;
        lock(&self.inner.state)
            .find(collection, id)
            .cloned()
            .map(Value::Object)
            .ok_or_else(|| ClientError::NotFound(NOT_FOUND_MESSAGE.to_string()))
    }

    async fn create(&self, collection: &str, payload: FormPayload) -> ClientResult<Value> {
        self.enter("create").await?;
        if collection == USERS_COLLECTION {
            return self.create_user(payload);
        }
        self.authorized_user()?;

        let fields = payload.to_json();
        for field in Self::required_fields(collection) {
            let present = fields
                .get(*field)
                .map(|value| value.as_str() != Some(""))
                .unwrap_or(false);
            if !present {
                return Err(validation(field, "Missing required value."));
            }
        }

        let mut state = lock(&self.inner.state);
        Self::check_reference(&state, collection, &fields)?;
        let record = state.new_record("r", fields);
        state.insert(collection, record.clone());
        Ok(Value::Object(record))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        payload: FormPayload,
    ) -> ClientResult<Value> {
        self.enter("update").await?;
        self.authorized_user()?;
        let fields = payload.to_json();

        let mut state = lock(&self.inner.state);
        Self::check_reference(&state, collection, &fields)?;
        let record = state
            .find_mut(collection, id)
            .ok_or_else(|| ClientError::NotFound(NOT_FOUND_MESSAGE.to_string()))?;
        for (name, value) in fields {
            record.insert(name, value);
        }
        Ok(Value::Object(record.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> ClientResult<()> {
        self.enter("delete").await?;
        self.authorized_user()?;
        let mut state = lock(&self.inner.state);
        if state.find(collection, id).is_none() {
            return Err(ClientError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        state.remove_cascading(collection, id);
        if collection == USERS_COLLECTION {
            state.tokens.retain(|_, user_id| user_id != id);
        }
        Ok(())
    }

    async fn request_password_reset(&self, _collection: &str, email: &str) -> ClientResult<()> {
        self.enter("request_password_reset").await?;
        if email.is_empty() {
            return Err(validation("email", "Cannot be blank."));
        }
        // Unknown emails succeed silently, like the real backend
        Ok(())
    }

    async fn confirm_password_reset(
        &self,
        _collection: &str,
        token: &str,
        password: &str,
        password_confirm: &str,
    ) -> ClientResult<()> {
        self.enter("confirm_password_reset").await?;
        if token.is_empty() {
            return Err(validation("token", "Invalid or expired token."));
        }
        if password != password_confirm {
            return Err(validation("passwordConfirm", "Values don't match."));
        }
        Ok(())
    }
}

#[async_trait]
impl GenerationApi for InMemoryBackend {
    async fn generate_user_stories(&self, project_id: &str) -> ClientResult<RecordList<UserStory>> {
        self.enter("generate_user_stories").await?;
        self.authorized_user()?;

        let mut state = lock(&self.inner.state);
        let project = state
            .find(PROJECT_COLLECTION, project_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("Project not found".to_string()))?;
        if project.get("brd_document").and_then(Value::as_str).unwrap_or("").is_empty() {
            return Err(validation("brd_document", "Project has no document to generate from."));
        }
        let owner = project.get("user").cloned().unwrap_or(Value::Null);

        let mut items = Vec::new();
        for index in 1..=self.inner.stories_per_document {
            let mut fields = Map::new();
            fields.insert("title".into(), Value::String(format!("Generated story {}", index)));
            fields.insert(
                "description".into(),
                Value::String(format!("As a user I want capability {}", index)),
            );
            fields.insert(
                "acceptance_criteria".into(),
                Value::String(format!("Capability {} works end to end", index)),
            );
            fields.insert("priority".into(), Value::String("medium".into()));
            fields.insert("story_points".into(), Value::from(index as u64));
            fields.insert("status".into(), Value::String("todo".into()));
            fields.insert("user".into(), owner.clone());
            fields.insert("project".into(), Value::String(project_id.to_string()));
            let record = state.new_record("s", fields);
            state.insert(USER_STORY_COLLECTION, record.clone());
            items.push(decode::<UserStory>(record)?);
        }

        Ok(generated_list(items))
    }

    async fn generate_test_cases(&self, user_story_id: &str) -> ClientResult<RecordList<TestCase>> {
        self.enter("generate_test_cases").await?;
        self.authorized_user()?;

        let mut state = lock(&self.inner.state);
        let story = state
            .find(USER_STORY_COLLECTION, user_story_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("User story not found".to_string()))?;
        let title = story
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut items = Vec::new();
        for index in 1..=self.inner.cases_per_story {
            let mut fields = Map::new();
            fields.insert("name".into(), Value::String(format!("{} case {}", title, index)));
            fields.insert(
                "description".into(),
                Value::String(format!("Verifies {}", title)),
            );
            fields.insert("preconditions".into(), Value::String("User is signed in".into()));
            fields.insert("steps".into(), Value::String("1. Open the page\n2. Act".into()));
            fields.insert("expected_result".into(), Value::String("It works".into()));
            fields.insert("user_story".into(), Value::String(user_story_id.to_string()));
            let record = state.new_record("t", fields);
            state.insert(TEST_CASE_COLLECTION, record.clone());
            items.push(decode::<TestCase>(record)?);
        }

        Ok(generated_list(items))
    }
}

fn generated_list<T>(items: Vec<T>) -> RecordList<T> {
    let count = items.len();
    RecordList {
        page: 1,
        per_page: count as u32,
        total_items: count as u64,
        total_pages: if count == 0 { 0 } else { 1 },
        items,
    }
}
