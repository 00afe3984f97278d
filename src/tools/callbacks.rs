/// Observer notified around every tool call.
///
/// All hooks default to no-ops.
pub trait ToolCallbacks: Send + Sync {
    fn on_tool_start(&self, _tool_name: &str, _input: &str) {}

    fn on_tool_end(&self, _tool_name: &str, _output: &str) {}

    fn on_tool_error(&self, _tool_name: &str, _error: &anyhow::Error) {}
}

/// Emits tool lifecycle events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCallbacks;

impl ToolCallbacks for TracingCallbacks {
    fn on_tool_start(&self, tool_name: &str, input: &str) {
        tracing::info!(tool = tool_name, input_len = input.len(), "tool start");
    }

    fn on_tool_end(&self, tool_name: &str, output: &str) {
        tracing::info!(tool = tool_name, output_len = output.len(), "tool end");
    }

    fn on_tool_error(&self, tool_name: &str, error: &anyhow::Error) {
        tracing::error!(tool = tool_name, "tool error: {:#}", error);
    }
}
