#![cfg(feature = "mock")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use crate::{
    deliver,
    errors::{Error, Result, ValidationError},
    http::ExecuteOptions,
    query::GameCharacterQuery,
    types::GameCharacterResponse,
};

/// In-memory mock configuration for offline tests.
#[derive(Default)]
pub struct MockConfig {
    pub responses: Vec<Result<GameCharacterResponse>>,
}

impl MockConfig {
    pub fn with_response(mut self, resp: GameCharacterResponse) -> Self {
        self.responses.push(Ok(resp));
        self
    }

    pub fn with_error(mut self, err: Error) -> Self {
        self.responses.push(Err(err));
        self
    }
}

/// A call observed by [`MockClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    /// Query parameters exactly as a real client would have sent them.
    pub query: Vec<(String, String)>,
    pub request_id: Option<String>,
}

/// Drop-in stand-in for [`crate::Client`] that serves queued envelopes.
#[derive(Clone)]
pub struct MockClient {
    inner: Arc<MockInner>,
}

impl MockClient {
    pub fn new(cfg: MockConfig) -> Self {
        Self {
            inner: Arc::new(MockInner {
                responses: Mutex::new(VecDeque::from(cfg.responses)),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub async fn execute(&self, query: Option<&GameCharacterQuery>) -> Result<GameCharacterResponse> {
        self.inner.next(query, ExecuteOptions::default())
    }

    pub async fn execute_with_callback<F>(
        &self,
        query: Option<&GameCharacterQuery>,
        callback: F,
    ) -> Result<GameCharacterResponse>
    where
        F: FnOnce(std::result::Result<&GameCharacterResponse, &Error>),
    {
        deliver(self.inner.next(query, ExecuteOptions::default()), callback)
    }

    pub async fn execute_with_options(
        &self,
        query: Option<&GameCharacterQuery>,
        options: ExecuteOptions,
    ) -> Result<GameCharacterResponse> {
        self.inner.next(query, options)
    }

    /// Synchronous view over the same queue, mirroring [`crate::BlockingClient`].
    pub fn blocking(&self) -> MockBlockingClient {
        MockBlockingClient {
            inner: self.inner.clone(),
        }
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.calls.lock().expect("lock poisoned").clone()
    }

    /// Number of queued responses not yet served.
    pub fn remaining(&self) -> usize {
        self.inner.responses.lock().expect("lock poisoned").len()
    }
}

#[derive(Clone)]
pub struct MockBlockingClient {
    inner: Arc<MockInner>,
}

impl MockBlockingClient {
    pub fn execute(&self, query: Option<&GameCharacterQuery>) -> Result<GameCharacterResponse> {
        self.inner.next(query, ExecuteOptions::default())
    }

    pub fn execute_with_callback<F>(
        &self,
        query: Option<&GameCharacterQuery>,
        callback: F,
    ) -> Result<GameCharacterResponse>
    where
        F: FnOnce(std::result::Result<&GameCharacterResponse, &Error>),
    {
        deliver(self.inner.next(query, ExecuteOptions::default()), callback)
    }
}

struct MockInner {
    responses: Mutex<VecDeque<Result<GameCharacterResponse>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockInner {
    fn next(
        &self,
        query: Option<&GameCharacterQuery>,
        options: ExecuteOptions,
    ) -> Result<GameCharacterResponse> {
        if let Some(q) = query {
            q.validate()?;
        }
        self.calls.lock().expect("lock poisoned").push(RecordedCall {
            query: query.map(GameCharacterQuery::to_query_pairs).unwrap_or_default(),
            request_id: options.request_id,
        });
        self.responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Err(ValidationError::new("no mock response queued").into()))
    }
}

/// Canned envelopes for tests.
pub mod fixtures {
    use crate::types::{
        AbilityScore, ClassInfo, GameCharacterData, GameCharacterResponse, RaceInfo, Stats,
        STATUS_ERROR, STATUS_OK,
    };

    pub fn elf_mage() -> GameCharacterData {
        let score = |value: i64| AbilityScore {
            value,
            modifier: (value - 10).div_euclid(2),
        };
        GameCharacterData {
            name: "Lyra Moonwhisper".into(),
            race: RaceInfo {
                name: "Elf".into(),
                traits: vec!["Darkvision".into(), "Fey Ancestry".into(), "Trance".into()],
            },
            class: ClassInfo {
                name: "Mage".into(),
                description: "A scholarly magic-user capable of manipulating the structures of reality".into(),
                primary_stat: "Intelligence".into(),
                hit_die: "d6".into(),
            },
            background: "Sage".into(),
            personality: "Endlessly curious and a little absent-minded".into(),
            motivation: "To recover a lost library of spells".into(),
            stats: Stats {
                strength: score(8),
                dexterity: score(14),
                constitution: score(12),
                intelligence: score(17),
                wisdom: score(13),
                charisma: score(10),
            },
            hp: 7,
        }
    }

    pub fn ok_response() -> GameCharacterResponse {
        GameCharacterResponse {
            status: STATUS_OK.into(),
            error: None,
            data: Some(elf_mage()),
            code: None,
        }
    }

    pub fn error_response(message: &str) -> GameCharacterResponse {
        GameCharacterResponse {
            status: STATUS_ERROR.into(),
            error: Some(message.into()),
            data: None,
            code: Some(400),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_query_and_serves_in_order() {
        let client = MockClient::new(
            MockConfig::default()
                .with_response(fixtures::ok_response())
                .with_response(fixtures::error_response("bad race")),
        );
        let blocking = client.blocking();

        let q = GameCharacterQuery::new().with_race("elf");
        let first = blocking.execute(Some(&q)).unwrap();
        assert!(first.is_ok());
        let second = blocking.execute(None).unwrap();
        assert_eq!(second.error.as_deref(), Some("bad race"));

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].query, vec![("race".to_string(), "elf".to_string())]);
        assert!(calls[1].query.is_empty());
        assert_eq!(client.remaining(), 0);
    }

    #[test]
    fn empty_queue_is_an_error() {
        let client = MockClient::new(MockConfig::default());
        assert!(matches!(client.blocking().execute(None), Err(Error::Validation(_))));
    }

    #[test]
    fn fixture_modifiers_follow_ability_scores() {
        let data = fixtures::elf_mage();
        assert_eq!(data.stats.strength.modifier, -1);
        assert_eq!(data.stats.intelligence.modifier, 3);
        assert_eq!(data.stats.charisma.modifier, 0);
    }
}
