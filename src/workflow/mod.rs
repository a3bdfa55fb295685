//! Flow — a small sequential/conditional/parallel workflow engine over an
//! agent network (§4.7).

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::{A2AError, A2AResult};
use crate::network::AgentNetwork;
use crate::router::Router;

/// Execution state threaded through a flow: every step's result is stored
/// under `_last`, plus any user-chosen key.
pub type Context = HashMap<String, Value>;

const LAST_KEY: &str = "_last";

type AsyncFn = dyn Fn(Context) -> Pin<Box<dyn Future<Output = A2AResult<Value>> + Send>> + Send + Sync;

/// One step in a flow.
pub enum Step {
    /// Calls `Ask` on a named agent with a `{var}`-substituted prompt.
    Query {
        agent: String,
        prompt_template: String,
        store_as: Option<String>,
    },
    /// Resolves the target agent via the router, then behaves like `Query`.
    AutoRoute {
        prompt_template: String,
        store_as: Option<String>,
    },
    /// An in-process callable.
    Function {
        f: Arc<AsyncFn>,
        store_as: Option<String>,
    },
    /// Branches on a predicate evaluated against the current `_last` value.
    Conditional {
        predicate: Predicate,
        then_branch: Vec<Step>,
        else_branch: Vec<Step>,
    },
    /// Runs branches concurrently and merges their results.
    Parallel {
        branches: Vec<Vec<Step>>,
        merge: MergeStrategy,
        concurrency_limit: Option<usize>,
        store_as: Option<String>,
    },
}

/// A predicate evaluated against the current context for [`Step::Conditional`].
pub enum Predicate {
    Substring(String),
    Regex(Regex),
    Custom(Arc<dyn Fn(&Context) -> bool + Send + Sync>),
}

impl Predicate {
    fn evaluate(&self, context: &Context) -> bool {
        match self {
            Predicate::Substring(needle) => last_as_string(context).contains(needle.as_str()),
            Predicate::Regex(re) => re.is_match(&last_as_string(context)),
            Predicate::Custom(f) => f(context),
        }
    }
}

fn last_as_string(context: &Context) -> String {
    context
        .get(LAST_KEY)
        .map(value_to_string)
        .unwrap_or_default()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// How a [`Step::Parallel`]'s branch results are combined into one value.
pub enum MergeStrategy {
    /// Joins string results with a separator (default `"\n\n"`).
    Concat(String),
    /// Collects every branch's result, in declaration order.
    List,
    /// A user-supplied merge over the ordered results.
    Custom(Arc<dyn Fn(Vec<Value>) -> Value + Send + Sync>),
}

impl Default for MergeStrategy {
    fn default() -> Self {
        MergeStrategy::Concat("\n\n".to_string())
    }
}

fn apply_merge(strategy: &MergeStrategy, results: Vec<Value>) -> Value {
    match strategy {
        MergeStrategy::Concat(sep) => {
            Value::String(results.iter().map(value_to_string).collect::<Vec<_>>().join(sep))
        }
        MergeStrategy::List => Value::Array(results),
        MergeStrategy::Custom(f) => f(results),
    }
}

/// Substitutes `{var}` placeholders in `template` from `context`, using the
/// value's string form.
fn substitute(template: &str, context: &Context) -> String {
    let mut result = template.to_string();
    for (key, value) in context {
        result = result.replace(&format!("{{{key}}}"), &value_to_string(value));
    }
    result
}

/// A builder and executor for agent workflows.
///
/// ```no_run
/// # #[cfg(feature = "client")]
/// # async fn example(network: std::sync::Arc<agentwire::network::AgentNetwork>) -> agentwire::A2AResult<()> {
/// use agentwire::workflow::Flow;
///
/// let result = Flow::new(network)
///     .ask("weather", "What's the weather like in {city}?")
///     .if_contains("rain")
///         .ask("activities", "Recommend indoor activities in {city}")
///     .else_branch()
///         .ask("activities", "Recommend outdoor activities in {city}")
///     .end_if()
///     .run_with(["city".to_string()].into_iter().zip(["Seattle".into()]).collect())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Flow {
    network: Arc<AgentNetwork>,
    steps: Vec<Step>,
    /// Non-empty only while a `.if_contains()/.if_matches()` is open and not
    /// yet closed by `.end_if()`.
    pending_conditional: Vec<PendingConditional>,
}

struct PendingConditional {
    predicate: Predicate,
    then_steps: Vec<Step>,
    else_steps: Vec<Step>,
    in_else: bool,
}

impl Flow {
    pub fn new(network: Arc<AgentNetwork>) -> Self {
        Self {
            network,
            steps: Vec::new(),
            pending_conditional: Vec::new(),
        }
    }

    fn push_step(&mut self, step: Step) {
        if let Some(open) = self.pending_conditional.last_mut() {
            if open.in_else {
                open.else_steps.push(step);
            } else {
                open.then_steps.push(step);
            }
        } else {
            self.steps.push(step);
        }
    }

    pub fn ask(mut self, agent: impl Into<String>, prompt_template: impl Into<String>) -> Self {
        self.push_step(Step::Query {
            agent: agent.into(),
            prompt_template: prompt_template.into(),
            store_as: None,
        });
        self
    }

    pub fn auto_route(mut self, prompt_template: impl Into<String>) -> Self {
        self.push_step(Step::AutoRoute {
            prompt_template: prompt_template.into(),
            store_as: None,
        });
        self
    }

    pub fn call<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = A2AResult<Value>> + Send + 'static,
    {
        self.push_step(Step::Function {
            f: Arc::new(move |ctx| Box::pin(f(ctx))),
            store_as: None,
        });
        self
    }

    pub fn if_contains(mut self, needle: impl Into<String>) -> Self {
        self.pending_conditional.push(PendingConditional {
            predicate: Predicate::Substring(needle.into()),
            then_steps: Vec::new(),
            else_steps: Vec::new(),
            in_else: false,
        });
        self
    }

    pub fn if_matches(mut self, pattern: Regex) -> Self {
        self.pending_conditional.push(PendingConditional {
            predicate: Predicate::Regex(pattern),
            then_steps: Vec::new(),
            else_steps: Vec::new(),
            in_else: false,
        });
        self
    }

    pub fn else_branch(mut self) -> Self {
        if let Some(open) = self.pending_conditional.last_mut() {
            open.in_else = true;
        }
        self
    }

    pub fn end_if(mut self) -> Self {
        if let Some(open) = self.pending_conditional.pop() {
            self.push_step(Step::Conditional {
                predicate: open.predicate,
                then_branch: open.then_steps,
                else_branch: open.else_steps,
            });
        }
        self
    }

    pub fn parallel(mut self, branches: Vec<Flow>, merge: MergeStrategy) -> Self {
        let branch_steps = branches.into_iter().map(|b| b.steps).collect();
        self.push_step(Step::Parallel {
            branches: branch_steps,
            merge,
            concurrency_limit: None,
            store_as: None,
        });
        self
    }

    /// Runs the flow with an empty starting context.
    pub async fn run(self) -> A2AResult<Value> {
        self.run_with(Context::new()).await
    }

    /// Runs the flow, seeding the execution context with `initial`.
    pub async fn run_with(self, initial: Context) -> A2AResult<Value> {
        let mut context = initial;
        run_steps(&self.network, &self.steps, &mut context).await?;
        Ok(context.get(LAST_KEY).cloned().unwrap_or(Value::Null))
    }
}

fn run_steps<'a>(
    network: &'a Arc<AgentNetwork>,
    steps: &'a [Step],
    context: &'a mut Context,
) -> Pin<Box<dyn Future<Output = A2AResult<()>> + Send + 'a>> {
    Box::pin(async move {
        for step in steps {
            run_step(network, step, context).await?;
        }
        Ok(())
    })
}

fn run_step<'a>(
    network: &'a Arc<AgentNetwork>,
    step: &'a Step,
    context: &'a mut Context,
) -> Pin<Box<dyn Future<Output = A2AResult<()>> + Send + 'a>> {
    Box::pin(async move {
        match step {
            Step::Query {
                agent,
                prompt_template,
                store_as,
            } => {
                let prompt = substitute(prompt_template, context);
                let reply = ask_agent(network, agent, &prompt).await?;
                store_result(context, store_as.as_deref(), Value::String(reply));
            }
            Step::AutoRoute {
                prompt_template,
                store_as,
            } => {
                let prompt = substitute(prompt_template, context);
                let router = Router::new(network);
                let route = router.route(&prompt).await;
                if route.agent_name.is_empty() {
                    return Err(A2AError::response("no agent available to route to"));
                }
                let reply = ask_agent(network, &route.agent_name, &prompt).await?;
                store_result(context, store_as.as_deref(), Value::String(reply));
            }
            Step::Function { f, store_as } => {
                let value = f(context.clone()).await?;
                store_result(context, store_as.as_deref(), value);
            }
            Step::Conditional {
                predicate,
                then_branch,
                else_branch,
            } => {
                let branch = if predicate.evaluate(context) {
                    then_branch
                } else {
                    else_branch
                };
                run_steps(network, branch, context).await?;
            }
            Step::Parallel {
                branches,
                merge,
                concurrency_limit,
                store_as,
            } => {
                let limit = concurrency_limit.unwrap_or(16).max(1);
                let mut results = Vec::with_capacity(branches.len());
                for chunk in branches.chunks(limit) {
                    // Each branch forks an independent copy of the context;
                    // branch-local mutations never leak across branches or
                    // back into the parent.
                    let mut branch_contexts: Vec<Context> =
                        chunk.iter().map(|_| context.clone()).collect();
                    let futures = chunk
                        .iter()
                        .zip(branch_contexts.iter_mut())
                        .map(|(branch, branch_context)| run_steps(network, branch, branch_context));
                    for result in futures::future::join_all(futures).await {
                        result?;
                    }
                    results.extend(
                        branch_contexts
                            .into_iter()
                            .map(|ctx| ctx.get(LAST_KEY).cloned().unwrap_or(Value::Null)),
                    );
                }
                let merged = apply_merge(merge, results);
                store_result(context, store_as.as_deref(), merged);
            }
        }
        Ok(())
    })
}

async fn ask_agent(network: &Arc<AgentNetwork>, agent: &str, prompt: &str) -> A2AResult<String> {
    #[cfg(feature = "client")]
    {
        let client = network.get(agent).await?;
        client.ask(prompt).await
    }
    #[cfg(not(feature = "client"))]
    {
        let _ = (network, agent, prompt);
        Err(A2AError::Config(
            "workflow steps require the `client` feature to call remote agents".to_string(),
        ))
    }
}

fn store_result(context: &mut Context, store_as: Option<&str>, value: Value) {
    if let Some(key) = store_as {
        context.insert(key.to_string(), value.clone());
    }
    context.insert(LAST_KEY.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_replaces_known_placeholders() {
        let mut context = Context::new();
        context.insert("city".to_string(), Value::String("Seattle".to_string()));
        let result = substitute("Weather in {city}?", &context);
        assert_eq!(result, "Weather in Seattle?");
    }

    #[test]
    fn substitute_leaves_unknown_placeholders_untouched() {
        let context = Context::new();
        let result = substitute("Weather in {city}?", &context);
        assert_eq!(result, "Weather in {city}?");
    }

    #[test]
    fn predicate_substring_matches_last_value() {
        let mut context = Context::new();
        context.insert(LAST_KEY.to_string(), Value::String("light rain expected".to_string()));
        let predicate = Predicate::Substring("rain".to_string());
        assert!(predicate.evaluate(&context));
    }

    #[test]
    fn merge_concat_joins_with_default_separator() {
        let merged = apply_merge(
            &MergeStrategy::default(),
            vec![Value::String("a".to_string()), Value::String("b".to_string())],
        );
        assert_eq!(merged, Value::String("a\n\nb".to_string()));
    }

    #[test]
    fn merge_list_preserves_declaration_order() {
        let merged = apply_merge(
            &MergeStrategy::List,
            vec![Value::String("a".to_string()), Value::String("b".to_string())],
        );
        assert_eq!(
            merged,
            Value::Array(vec![Value::String("a".to_string()), Value::String("b".to_string())])
        );
    }
}
