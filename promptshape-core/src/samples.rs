pub const SAMPLE_PROMPTS: [&str; 5] = [
    "Write a Python function to scrape a website and save results to CSV",
    "Create a SQL query to find the top 10 customers by revenue",
    "Build a JavaScript function to validate email addresses",
    "Explain how Docker containers work",
    "Create a React component for a todo list",
];

/// 1-based lookup, matching how the list is shown to users.
pub fn sample_prompt(n: usize) -> Option<&'static str> {
    n.checked_sub(1).and_then(|i| SAMPLE_PROMPTS.get(i)).copied()
}
