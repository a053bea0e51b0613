use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use eca_automaton::{Neighborhood, RuleTable};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{PredictionError, PredictionResult};
use crate::predictor::NextStatePredictor;
use crate::prompt::{parse_cell_response, parse_row_response, PromptTemplate};
use crate::resolver::LlmResolver;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sampling options sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        // Greedy decoding.
        Self {
            temperature: 0.0,
            max_tokens: 64,
        }
    }
}

/// Predictor backed by OpenAI-compatible `/chat/completions` endpoints.
///
/// Construct one and hand it to whatever needs predictions; the HTTP client
/// and resolver list live as long as the handle does. Requests rotate across
/// resolvers round-robin.
pub struct ChatCompletionPredictor {
    resolvers: Vec<LlmResolver>,
    client: Client,
    cursor: AtomicUsize,
    prompt: PromptTemplate,
    options: GenerationOptions,
}

impl ChatCompletionPredictor {
    /// Build the predictor from resolvers. At least one resolver is required.
    pub fn new(resolvers: Vec<LlmResolver>) -> PredictionResult<Self> {
        Self::with_timeout(resolvers, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Same as [`new`](Self::new) with an explicit request timeout.
    pub fn with_timeout(resolvers: Vec<LlmResolver>, timeout: Duration) -> PredictionResult<Self> {
        if resolvers.is_empty() {
            return Err(PredictionError::NoResolvers);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            resolvers,
            client,
            cursor: AtomicUsize::new(0),
            prompt: PromptTemplate::default(),
            options: GenerationOptions::default(),
        })
    }

    /// Convenience constructor using resolver configuration drawn from the environment.
    pub fn from_env() -> PredictionResult<Self> {
        Self::new(LlmResolver::load_from_env()?)
    }

    /// Override the prompts.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    /// Override sampling options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolvers(&self) -> &[LlmResolver] {
        &self.resolvers
    }

    fn select_resolver(&self) -> &LlmResolver {
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed);
        &self.resolvers[idx % self.resolvers.len()]
    }

    fn invoke_model(
        &self,
        resolver: &LlmResolver,
        system_prompt: &str,
        payload: &str,
        max_tokens: u32,
    ) -> PredictionResult<String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !resolver.api_key.is_empty() {
            let value = HeaderValue::from_str(&format!("Bearer {}", resolver.api_key))
                .map_err(|e| PredictionError::Config(format!("invalid api key header: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let url = format!("{}/chat/completions", resolver.api_url.trim_end_matches('/'));
        let body = json!({
            "model": resolver.model_name,
            "temperature": self.options.temperature,
            "max_tokens": max_tokens,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": payload}
            ]
        });

        let response = self.client.post(url).headers(headers).json(&body).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(PredictionError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response.json().map_err(|e| {
            PredictionError::malformed(format!("undecodable completion: {e}"), "")
        })?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| PredictionError::malformed("llm response missing choices", ""))?;
        debug!(
            target: "eca::llm",
            model = %resolver.model_name,
            chars = content.len(),
            "llm response received"
        );
        Ok(content)
    }
}

impl NextStatePredictor for ChatCompletionPredictor {
    fn name(&self) -> &str {
        "chat-completion"
    }

    fn predict(&self, neighborhood: Neighborhood, rules: &RuleTable) -> PredictionResult<u8> {
        let resolver = self.select_resolver();
        let payload = self.prompt.cell_prompt(neighborhood, rules);
        let raw = self.invoke_model(
            resolver,
            &self.prompt.cell_system_prompt,
            &payload,
            self.options.max_tokens,
        )?;
        parse_cell_response(&raw).inspect_err(|err| {
            warn!(
                target: "eca::llm",
                model = %resolver.model_name,
                neighborhood = %neighborhood,
                "unexpected cell reply: {err}"
            );
        })
    }

    /// Asks for the whole row in one request.
    fn predict_row(&self, row: &[u8], rules: &RuleTable) -> PredictionResult<Vec<u8>> {
        let resolver = self.select_resolver();
        let payload = self.prompt.row_prompt(row, rules);
        // Room for a JSON array of the whole row.
        let max_tokens = self.options.max_tokens.max(row.len() as u32 * 4 + 32);
        let raw = self.invoke_model(
            resolver,
            &self.prompt.row_system_prompt,
            &payload,
            max_tokens,
        )?;
        parse_row_response(&raw, row.len()).inspect_err(|err| {
            warn!(
                target: "eca::llm",
                model = %resolver.model_name,
                "unexpected row reply: {err}"
            );
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;

    /// Serve one canned HTTP reply on a local port and hand back the raw
    /// request (head and body) that was received.
    fn serve_once(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/v1", listener.local_addr().unwrap());
        let reply = format!(
            "HTTP/1.1 {status_line}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();
            request.push_str(&String::from_utf8(body).unwrap());

            let mut stream = stream;
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        (url, handle)
    }

    fn local_predictor(url: &str, api_key: &str) -> ChatCompletionPredictor {
        ChatCompletionPredictor::with_timeout(
            vec![LlmResolver::new(url, api_key, "phi3")],
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request_body(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_requires_resolvers() {
        assert!(matches!(
            ChatCompletionPredictor::new(Vec::new()),
            Err(PredictionError::NoResolvers)
        ));
    }

    #[test]
    fn test_round_robin() {
        let predictor = ChatCompletionPredictor::new(vec![
            LlmResolver::ollama("a"),
            LlmResolver::ollama("b"),
        ])
        .unwrap();
        let picked: Vec<String> = (0..4)
            .map(|_| predictor.select_resolver().model_name.clone())
            .collect();
        assert_eq!(picked, vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let predictor = ChatCompletionPredictor::with_timeout(
            vec![LlmResolver::new("http://127.0.0.1:9/v1", "", "none")],
            Duration::from_millis(200),
        )
        .unwrap();
        let err = predictor
            .predict(Neighborhood::new(0, 1, 0).unwrap(), &RuleTable::from(30))
            .unwrap_err();
        assert!(matches!(err, PredictionError::Transport(_)));
    }

    #[test]
    fn test_request_shape_and_structured_reply() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"state\":1}"}}]}"#,
        );
        let predictor = local_predictor(&url, "sk-test");
        let neighborhood = Neighborhood::new(1, 0, 0).unwrap();

        let state = predictor
            .predict(neighborhood, &RuleTable::from(30))
            .unwrap();
        assert_eq!(state, 1);

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(request
            .to_ascii_lowercase()
            .contains("authorization: bearer sk-test"));

        let body = request_body(&request);
        assert_eq!(body["model"], "phi3");
        assert_eq!(body["temperature"], 0.0);
        assert_eq!(body["max_tokens"], 64);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], predictor.prompt.cell_system_prompt);
        assert_eq!(messages[1]["role"], "user");
        assert!(messages[1]["content"]
            .as_str()
            .unwrap()
            .contains("Neighborhood: 100"));
    }

    #[test]
    fn test_empty_api_key_sends_no_authorization() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"0"}}]}"#,
        );
        let predictor = local_predictor(&url, "");

        let state = predictor
            .predict(Neighborhood::new(0, 0, 0).unwrap(), &RuleTable::from(30))
            .unwrap();
        assert_eq!(state, 0);

        let request = server.join().unwrap();
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[test]
    fn test_non_success_status_is_http_error() {
        let (url, server) = serve_once("500 Internal Server Error", "model overloaded");
        let predictor = local_predictor(&url, "");

        let err = predictor
            .predict(Neighborhood::new(0, 1, 0).unwrap(), &RuleTable::from(30))
            .unwrap_err();
        server.join().unwrap();
        match err {
            PredictionError::Http { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model overloaded");
            }
            other => panic!("expected http error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_choices_is_malformed() {
        let (url, server) = serve_once("200 OK", r#"{"choices":[]}"#);
        let predictor = local_predictor(&url, "");

        let err = predictor
            .predict(Neighborhood::new(0, 1, 0).unwrap(), &RuleTable::from(30))
            .unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, PredictionError::MalformedResponse { .. }));
    }

    #[test]
    fn test_row_request_reserves_tokens_for_the_row() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"{\"cells\":[0,1,1,1,0]}"}}]}"#,
        );
        let predictor = local_predictor(&url, "");

        let row = predictor
            .predict_row(&[0, 0, 1, 0, 0], &RuleTable::from(30))
            .unwrap();
        assert_eq!(row, vec![0, 1, 1, 1, 0]);

        let body = request_body(&server.join().unwrap());
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["content"], predictor.prompt.row_system_prompt);
    }

    #[test]
    fn test_completion_deserializes() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"state\":1}"}}]}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parse_cell_response(&completion.choices[0].message.content).unwrap(),
            1
        );
    }
}
