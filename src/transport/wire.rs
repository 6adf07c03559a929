use super::ChatRequest;
use crate::conversation::{Message, Role};
use serde::{Deserialize, Serialize};

/// Request body layout sent to the endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WireFormat {
    /// `{message, context, history}` for a server-side proxy.
    #[default]
    Proxy,
    /// `{contents: [{role, parts: [{text}]}]}` for a generate-content style
    /// model endpoint.
    GenerateContent,
}

#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    message: &'a str,
    context: &'a str,
    history: &'a [Message],
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

impl Content {
    fn new(role: &'static str, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl WireFormat {
    /// JSON body for `request`. `assistant_name` is only used by formats that
    /// steer the model's voice per message.
    pub fn encode(self, request: &ChatRequest, assistant_name: &str) -> serde_json::Value {
        let body = match self {
            Self::Proxy => serde_json::to_value(ProxyRequest {
                message: &request.message,
                context: &request.context,
                history: &request.history,
            }),
            Self::GenerateContent => {
                serde_json::to_value(generate_content_body(request, assistant_name))
            }
        };
        body.unwrap_or(serde_json::Value::Null)
    }
}

fn model_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant | Role::System => "model",
    }
}

fn grounded_prompt(message: &str, assistant_name: &str) -> String {
    format!("Using the website info above, answer as {assistant_name}: {message}")
}

/// Site context leads as a model turn unless the history already starts
/// with a seeded system entry. The newest user turn is wrapped with the
/// grounding prompt.
fn generate_content_body(request: &ChatRequest, assistant_name: &str) -> GenerateContentRequest {
    let mut contents = Vec::with_capacity(request.history.len() + 2);

    let seeded = request
        .history
        .first()
        .is_some_and(|m| m.role() == Role::System);
    if !seeded && !request.context.is_empty() {
        contents.push(Content::new("model", request.context.clone()));
    }

    let ends_with_current = request
        .history
        .last()
        .is_some_and(|m| m.role() == Role::User && m.content() == request.message);
    let (earlier, current) = if ends_with_current {
        request.history.split_at(request.history.len() - 1)
    } else {
        (request.history.as_slice(), &[][..])
    };

    for message in earlier {
        contents.push(Content::new(model_role(message.role()), message.content()));
    }
    let prompt = current
        .first()
        .map_or(request.message.as_str(), Message::content);
    contents.push(Content::new("user", grounded_prompt(prompt, assistant_name)));

    GenerateContentRequest { contents }
}
