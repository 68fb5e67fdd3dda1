//! WASM bindings for mathlax
//!
//! This module provides JavaScript-accessible functions for parsing LaTeX
//! math into a document tree, one-shot or while the user types.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{IncrementalParser, LatexParser, Node, ParserOptions};

/// Parse options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ParseOptions {
    /// Maximum nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[cfg(feature = "wasm")]
impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

#[cfg(feature = "wasm")]
fn default_max_depth() -> usize {
    ParserOptions::default().max_depth
}

/// Parse result with metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ParseOutput {
    /// The document tree; an empty document on failure
    pub document: Node,
    /// Whether the whole input parsed
    pub success: bool,
    /// Error message if parsing failed
    pub error: Option<String>,
}

/// State of an incremental session after an edit
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct IncrementalOutput {
    pub document: Node,
    pub progress: f64,
    pub unparsed: String,
}

/// Safely serialize a value to JsValue, returning an error object on failure.
#[cfg(feature = "wasm")]
fn to_js_value<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        let error_obj = ParseOutput {
            document: Node::Document(Vec::new()),
            success: false,
            error: Some(format!("Serialization error: {}", e)),
        };
        serde_wasm_bindgen::to_value(&error_obj).unwrap_or(JsValue::NULL)
    })
}

/// Turn a caught panic payload into a message.
#[cfg(feature = "wasm")]
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Parse failed: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Parse failed: {}", s)
    } else {
        "Parse failed: unknown error (check browser console for details)".to_string()
    }
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Parse LaTeX math into a document tree
///
/// # Arguments
/// * `input` - LaTeX math code (without $ delimiters)
/// * `options` - `{ max_depth }`, optional
///
/// # Returns
/// `{ document, success, error }`
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "parseLatex")]
pub fn parse_latex_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: ParseOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    let parser_options = ParserOptions::new().with_max_depth(opts.max_depth);

    let result = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        LatexParser::with_options(parser_options).parse(input)
    })) {
        Ok(Ok(document)) => ParseOutput {
            document,
            success: true,
            error: None,
        },
        Ok(Err(err)) => ParseOutput {
            document: Node::Document(Vec::new()),
            success: false,
            error: Some(err.to_string()),
        },
        Err(payload) => ParseOutput {
            document: Node::Document(Vec::new()),
            success: false,
            error: Some(panic_message(payload)),
        },
    };

    to_js_value(&result)
}

/// Parse the longest valid prefix of LaTeX math
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "parseLatexPartial")]
pub fn parse_latex_partial_wasm(input: &str) -> JsValue {
    let mut parser = IncrementalParser::new();
    parser.parse_partial(input);
    to_js_value(&IncrementalOutput {
        document: parser.current_document().clone(),
        progress: parser.progress(),
        unparsed: parser.unparsed_content().to_string(),
    })
}

/// An incremental parser held on the JavaScript side
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct IncrementalSession {
    inner: IncrementalParser,
}

#[cfg(feature = "wasm")]
impl Default for IncrementalSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl IncrementalSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: IncrementalParser::new(),
        }
    }

    /// Append typed text; returns `{ document, progress, unparsed }`
    pub fn append(&mut self, text: &str) -> JsValue {
        self.inner.append(text);
        self.snapshot()
    }

    /// Replace the whole buffer; returns `{ document, progress, unparsed }`
    #[wasm_bindgen(js_name = "setText")]
    pub fn set_text(&mut self, text: &str) -> JsValue {
        self.inner.parse_partial(text);
        self.snapshot()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn progress(&self) -> f64 {
        self.inner.progress()
    }

    pub fn unparsed(&self) -> String {
        self.inner.unparsed_content().to_string()
    }

    pub fn document(&self) -> JsValue {
        to_js_value(self.inner.current_document())
    }
}

#[cfg(feature = "wasm")]
impl IncrementalSession {
    fn snapshot(&self) -> JsValue {
        to_js_value(&IncrementalOutput {
            document: self.inner.current_document().clone(),
            progress: self.inner.progress(),
            unparsed: self.inner.unparsed_content().to_string(),
        })
    }
}
