//! NDJSON evaluation-stream consumer.
//!
//! ARCHITECTURE
//! ============
//! `gloo-net` buffers whole responses, so the streamed endpoint is driven
//! with raw `web-sys` fetch: read the response body chunk by chunk, split it
//! into lines, and decode each line as an event. A [`RunHandle`] wraps the
//! `AbortController` so the playground can cancel mid-run (and `on_cleanup`
//! can cancel on navigation); the server notices the closed body and stops.

use shared::stream::EvalEvent;
#[cfg(feature = "csr")]
use shared::stream::{LineSplitter, decode_event};

use shared::EvalRequest;

/// Cancellation handle for one streamed run.
#[derive(Clone, Default)]
pub struct RunHandle {
    #[cfg(feature = "csr")]
    controller: Option<web_sys::AbortController>,
}

impl RunHandle {
    #[must_use]
    pub fn new() -> Self {
        #[cfg(feature = "csr")]
        {
            Self { controller: web_sys::AbortController::new().ok() }
        }
        #[cfg(not(feature = "csr"))]
        {
            Self {}
        }
    }

    /// Abort the in-flight fetch. Safe to call more than once.
    pub fn cancel(&self) {
        #[cfg(feature = "csr")]
        if let Some(controller) = &self.controller {
            controller.abort();
        }
    }
}

#[cfg(feature = "csr")]
fn js_error(context: &str, value: &wasm_bindgen::JsValue) -> String {
    format!("{context}: {value:?}")
}

/// POST the run request and feed each decoded event to `on_event`.
///
/// Lines that do not decode are reported through `on_skip` and otherwise
/// ignored. Returns after a terminal event, end of stream, or abort.
///
/// # Errors
///
/// Returns a display-ready message when the fetch cannot start or the body
/// cannot be read. An abort surfaces as `Ok(())` once the stream closes.
#[allow(clippy::unused_async)]
pub async fn stream_evaluation<F, G>(
    token: &str,
    req: &EvalRequest,
    handle: &RunHandle,
    mut on_event: F,
    mut on_skip: G,
) -> Result<(), String>
where
    F: FnMut(EvalEvent),
    G: FnMut(),
{
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen_futures::JsFuture;

        let body = serde_json::to_string(req).map_err(|e| e.to_string())?;

        let headers = web_sys::Headers::new().map_err(|e| js_error("headers", &e))?;
        headers
            .append("Content-Type", "application/json")
            .map_err(|e| js_error("headers", &e))?;
        headers
            .append("Authorization", &format!("Bearer {token}"))
            .map_err(|e| js_error("headers", &e))?;

        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&wasm_bindgen::JsValue::from_str(&body));
        if let Some(controller) = &handle.controller {
            init.set_signal(Some(&controller.signal()));
        }

        let request = web_sys::Request::new_with_str_and_init(super::api::EVALUATE_ROWS_ENDPOINT, &init)
            .map_err(|e| js_error("request", &e))?;
        let window = web_sys::window().ok_or_else(|| "no window".to_owned())?;

        let resp: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("fetch", &e))?
            .dyn_into()
            .map_err(|e| js_error("response", &e))?;

        if !resp.ok() {
            return Err(super::api::request_failed_message(resp.status(), ""));
        }

        let stream = resp.body().ok_or_else(|| "response has no body".to_owned())?;
        let reader: web_sys::ReadableStreamDefaultReader = stream
            .get_reader()
            .dyn_into()
            .map_err(|e| js_error("reader", &e))?;

        let mut splitter = LineSplitter::new();
        loop {
            // reader.read() resolves to { done: bool, value: Uint8Array }.
            let chunk = match JsFuture::from(reader.read()).await {
                Ok(chunk) => chunk,
                // An abort rejects the pending read; treat it as end of stream.
                Err(_) => break,
            };
            let done = js_sys::Reflect::get(&chunk, &"done".into())
                .ok()
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            if done {
                break;
            }
            let value = js_sys::Reflect::get(&chunk, &"value".into())
                .map_err(|e| js_error("chunk", &e))?;
            let bytes = js_sys::Uint8Array::new(&value).to_vec();

            for line in splitter.push(&bytes) {
                match decode_event(&line) {
                    Ok(event) => {
                        let terminal = event.is_terminal();
                        on_event(event);
                        if terminal {
                            return Ok(());
                        }
                    }
                    Err(_) => on_skip(),
                }
            }
        }

        // Flush a final unterminated line, if the server was cut off mid-write.
        if let Some(line) = splitter.finish() {
            match decode_event(&line) {
                Ok(event) => on_event(event),
                Err(_) => on_skip(),
            }
        }
        Ok(())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (token, req, handle, &mut on_event, &mut on_skip);
        Err("not available on server".to_owned())
    }
}
