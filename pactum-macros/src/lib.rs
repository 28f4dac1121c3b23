//! Attribute macros for `pactum`.
//!
//! - `#[pactum::main]` runs `main` inside a fresh runtime.
//! - `#[pactum::test]` does the same for a test function.
//!
//! Both wrap the function body in `Runtime::run`, so every future and timer
//! created by the body is driven until the runtime goes idle.

use proc_macro::{Delimiter, Group, TokenStream, TokenTree};

/// Settings accepted by `#[pactum::main(...)]`.
#[derive(Default)]
struct Options {
    max_microtasks_per_turn: Option<usize>,
    log_unhandled_rejections: Option<bool>,
}

impl Options {
    fn parse(attr: TokenStream) -> Result<Self, String> {
        let mut options = Options::default();
        let attr = attr.to_string();

        for part in attr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                return Err(format!("expected `key = value`, got `{part}`"));
            };

            let value = value.trim();

            match key.trim() {
                "max_microtasks_per_turn" => {
                    let n = value
                        .replace('_', "")
                        .parse::<usize>()
                        .map_err(|_| format!("invalid max_microtasks_per_turn `{value}`"))?;
                    options.max_microtasks_per_turn = Some(n);
                }
                "log_unhandled_rejections" => {
                    let enabled = value
                        .parse::<bool>()
                        .map_err(|_| format!("invalid log_unhandled_rejections `{value}`"))?;
                    options.log_unhandled_rejections = Some(enabled);
                }
                other => return Err(format!("unknown option `{other}`")),
            }
        }

        Ok(options)
    }

    fn builder(&self) -> String {
        let mut builder = String::from("::pactum::RuntimeBuilder::new()");

        if let Some(n) = self.max_microtasks_per_turn {
            builder.push_str(&format!(".max_microtasks_per_turn({n})"));
        }

        if let Some(enabled) = self.log_unhandled_rejections {
            builder.push_str(&format!(".log_unhandled_rejections({enabled})"));
        }

        builder.push_str(".build()");
        builder
    }
}

/// Replaces the body of the function in `tokens` by `wrap(body)`.
fn wrap_body(mut tokens: Vec<TokenTree>, wrap: impl FnOnce(String) -> String) -> TokenStream {
    let Some(pos) = tokens
        .iter()
        .rposition(|t| matches!(t, TokenTree::Group(g) if g.delimiter() == Delimiter::Brace))
    else {
        return compile_error("expected a function body");
    };

    let body = match &tokens[pos] {
        TokenTree::Group(g) => g.stream().to_string(),
        _ => unreachable!(),
    };

    let stream = match wrap(body).parse::<TokenStream>() {
        Ok(stream) => stream,
        Err(err) => return compile_error(&err.to_string()),
    };

    tokens[pos] = TokenTree::Group(Group::new(Delimiter::Brace, stream));
    tokens.into_iter().collect()
}

fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({message:?});")
        .parse()
        .unwrap_or_default()
}

/// Runs `main` inside a fresh runtime.
///
/// Accepts `max_microtasks_per_turn = N` and `log_unhandled_rejections = bool`.
///
/// ```rust,ignore
/// #[pactum::main(max_microtasks_per_turn = 10_000)]
/// fn main() {
///     pactum::Future::<i32, String>::resolve(1).then(|v| Ok(v + 1));
/// }
/// ```
#[proc_macro_attribute]
pub fn main(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = match Options::parse(attr) {
        Ok(options) => options,
        Err(message) => return compile_error(&message),
    };

    let builder = options.builder();

    wrap_body(item.into_iter().collect(), |body| {
        format!(
            "{{
                let runtime = {builder};
                runtime
                    .run(move || {{ {body} }})
                    .expect(\"pactum runtime failed\")
            }}"
        )
    })
}

/// Runs a test inside a fresh runtime.
///
/// The body runs first; the runtime is then driven until idle. Use
/// [`Future::wait`](../pactum/struct.Future.html#method.wait) to drive it
/// earlier.
#[proc_macro_attribute]
pub fn test(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let function = wrap_body(item.into_iter().collect(), |body| {
        format!(
            "{{
                let runtime = ::pactum::RuntimeBuilder::new().build();
                runtime
                    .run(move || {{ {body} }})
                    .expect(\"pactum runtime failed\");
            }}"
        )
    });

    let mut result: TokenStream = "#[test]".parse().unwrap_or_default();
    result.extend(function);
    result
}
