//! Prompt composer: document type + style → instruction template.
//!
//! The rendered template has the shape
//!
//! ```text
//! <base instruction>
//! Style Constraint: <tone>
//!
//! Context: <context slot>
//!
//! Question: <question slot>
//! ```
//!
//! Labels are matched exactly; anything unrecognized falls back to
//! `Technical` / `Technical (Default)`.

/// Default slot marker for retrieved context.
pub const CONTEXT_SLOT: &str = "{context_str}";
/// Default slot marker for the user question.
pub const QUESTION_SLOT: &str = "{query_str}";

pub const DEFAULT_DOC_TYPE: &str = "Technical";
pub const DEFAULT_DOC_STYLE: &str = "Technical (Default)";

/// Kind of document the answer should read like.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocType {
    ArchitectureDocumentation,
    Requirements,
    UserGuide,
    ApiReference,
    Technical,
}

impl DocType {
    pub const ALL: [DocType; 5] = [
        DocType::ArchitectureDocumentation,
        DocType::Requirements,
        DocType::UserGuide,
        DocType::ApiReference,
        DocType::Technical,
    ];

    /// Parses a UI label; unknown labels map to [`DocType::Technical`].
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == label)
            .unwrap_or(DocType::Technical)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocType::ArchitectureDocumentation => "Architecture Documentation",
            DocType::Requirements => "Requirements",
            DocType::UserGuide => "User Guide",
            DocType::ApiReference => "API Reference",
            DocType::Technical => "Technical",
        }
    }

    /// Persona and task instruction placed at the top of the prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            DocType::ArchitectureDocumentation => {
                "You are a Senior Software Architect. Analyze the provided context (code snippets and journal entries) to document the system's architecture. Focus on components, data flow, patterns, and high-level structure. "
            }
            DocType::Requirements => {
                "You are a Business Analyst. Analyze the code and comments to reverse-engineer the functional and non-functional requirements. List them clearly as 'User Stories' or 'System Requirements'. "
            }
            DocType::UserGuide => {
                "You are a Technical Writer. Write a user-friendly guide explaining how to use the features found in the context. Avoid jargon where possible and focus on user flows. "
            }
            DocType::ApiReference => {
                "You are a Developer Advocate. Document the API endpoints, request/response formats, and authentication methods found in the code. Use OpenAPI/Swagger style descriptions. "
            }
            DocType::Technical => {
                "You are a Senior Developer. Answer the technical question based on the provided code context. Just answer the question."
            }
        }
    }
}

/// Tone modifier appended as the style constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocStyle {
    TechnicalDefault,
    BeginnerFriendly,
    Comprehensive,
    Minimal,
}

impl DocStyle {
    pub const ALL: [DocStyle; 4] = [
        DocStyle::TechnicalDefault,
        DocStyle::BeginnerFriendly,
        DocStyle::Comprehensive,
        DocStyle::Minimal,
    ];

    /// Parses a UI label; unknown labels map to [`DocStyle::TechnicalDefault`].
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.label() == label)
            .unwrap_or(DocStyle::TechnicalDefault)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocStyle::TechnicalDefault => "Technical (Default)",
            DocStyle::BeginnerFriendly => "Beginner Friendly",
            DocStyle::Comprehensive => "Comprehensive",
            DocStyle::Minimal => "Minimal",
        }
    }

    pub fn tone(&self) -> &'static str {
        match self {
            DocStyle::TechnicalDefault => {
                "Use precise technical terminology. Be concise and professional."
            }
            DocStyle::BeginnerFriendly => {
                "Explain complex concepts simply. Use analogies where appropriate. Assume the reader is a junior developer."
            }
            DocStyle::Comprehensive => {
                "Be extremely detailed. Cover edge cases, implementation details, and rationale. Leave no stone unturned."
            }
            DocStyle::Minimal => "Be extremely concise. Bullet points preferred. Only essential information.",
        }
    }
}

/// Instruction template with a context slot and a question slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
    context_slot: String,
    question_slot: String,
}

impl PromptTemplate {
    /// Composes the template for `(doc_type, doc_style)` with the given
    /// slot markers. Pure and deterministic.
    pub fn compose(
        doc_type: &str,
        doc_style: &str,
        context_placeholder: &str,
        question_placeholder: &str,
    ) -> Self {
        let base = DocType::from_label(doc_type).instruction();
        let tone = DocStyle::from_label(doc_style).tone();
        let text = format!(
            "{base}\nStyle Constraint: {tone}\n\nContext: {context_placeholder}\n\nQuestion: {question_placeholder}"
        );

        Self {
            text,
            context_slot: context_placeholder.to_string(),
            question_slot: question_placeholder.to_string(),
        }
    }

    /// [`PromptTemplate::compose`] with [`CONTEXT_SLOT`] / [`QUESTION_SLOT`].
    pub fn for_query(doc_type: &str, doc_style: &str) -> Self {
        Self::compose(doc_type, doc_style, CONTEXT_SLOT, QUESTION_SLOT)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Fills both slots in one left-to-right pass. Slot markers that show up
    /// inside `context` or `question` are copied verbatim.
    pub fn render(&self, context: &str, question: &str) -> String {
        let slots = [
            (self.context_slot.as_str(), context),
            (self.question_slot.as_str(), question),
        ];

        let mut out = String::with_capacity(self.text.len() + context.len() + question.len());
        let mut rest = self.text.as_str();
        loop {
            let next = slots
                .iter()
                .filter(|(slot, _)| !slot.is_empty())
                .filter_map(|(slot, value)| rest.find(slot).map(|i| (i, *slot, *value)))
                .min_by_key(|(i, _, _)| *i);

            match next {
                Some((i, slot, value)) => {
                    out.push_str(&rest[..i]);
                    out.push_str(value);
                    rest = &rest[i + slot.len()..];
                }
                None => {
                    out.push_str(rest);
                    break;
                }
            }
        }
        out
    }
}
