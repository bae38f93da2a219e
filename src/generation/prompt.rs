//! Prompt text sent to the model

/// Full prompt for a first generation. The context block is omitted when empty.
pub fn generation_prompt(system_prompt: &str, query: &str, env_context: &str) -> String {
    if env_context.is_empty() {
        format!("{system_prompt}\n\nUser: {query}\nAssistant:")
    } else {
        format!("{system_prompt}\n\n{env_context}\n\nUser: {query}\nAssistant:")
    }
}

/// Prompt asking for a corrected command.
pub fn fix_prompt(original_query: &str, failed_command: &str, failure_output: &str) -> String {
    format!(
        "The following command failed:\n\
         Command: {failed_command}\n\
         Error output: {failure_output}\n\
         \n\
         Original request: {original_query}\n\
         \n\
         Please generate a corrected command that will fix the issue. \
         Only respond with the corrected command(s), no explanations."
    )
}
