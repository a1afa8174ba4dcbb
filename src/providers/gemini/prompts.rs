//! Prompt templates sent to the model.

const CONVENTIONAL_TYPES: &str = "feat, fix, docs, style, refactor, test, chore";

pub fn critique(message: &str) -> String {
    format!(
        "You are a senior software engineer reviewing a single Git commit message.\n\
         Judge it against common best practices: a concise imperative subject line, \
         a Conventional Commits type ({CONVENTIONAL_TYPES}) where it fits, \
         and a body that explains what changed and why when the change is not trivial.\n\
         Reply with a short, constructive critique of at most 6 lines. \
         Name what is good, what is missing, and one concrete improvement.\n\n\
         Commit message:\n{message}\n"
    )
}

pub fn review_history(subjects: &[&str]) -> String {
    let commits = subjects
        .iter()
        .map(|subject| format!("- {subject}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an encouraging senior software engineer and an expert in version control.\n\
         Below is a list of separate commit messages from one developer. \
         Look at them as a whole and describe the developer's habits. \
         Keep a supportive tone and stay under 20 lines.\n\
         Structure the answer exactly like this:\n\n\
         **Strengths:**\n- ...\n\n\
         **Weaknesses:**\n- ...\n\n\
         **Advice:**\n- (actionable advice tied to a weakness)\n\n\
         Commits:\n{commits}\n"
    )
}

pub fn rewrite(message: &str) -> String {
    format!(
        "You are a Git expert. Rewrite the commit message below as an ideal Conventional Commit.\n\
         Infer the type ({CONVENTIONAL_TYPES}). \
         Write the subject in the imperative mood, e.g. \"Add feature\" not \"Added feature\".\n\
         Reply with the rewritten commit message only, without any explanation.\n\n\
         Commit message:\n{message}\n"
    )
}

pub fn compose(description: &str) -> String {
    format!(
        "You write concise Conventional Commits messages.\n\
         Turn the description of changes below into a commit message:\n\
         1. Follow the Conventional Commits specification and infer the type ({CONVENTIONAL_TYPES}).\n\
         2. Use the imperative mood and start the subject with a lowercase letter.\n\
         3. For a detailed description, add a blank line and a short bullet-point body with what and why.\n\
         4. Reply with the commit message only.\n\n\
         Description:\n{description}\n"
    )
}

pub fn compose_from_diff(old_code: &str, new_code: &str) -> String {
    format!(
        "You write concise Conventional Commits messages.\n\
         Compare the old and new code below and write a commit message summarizing the change:\n\
         1. Infer the type ({CONVENTIONAL_TYPES}) from what the change does.\n\
         2. Keep the subject lowercase, imperative and under 50 characters.\n\
         3. For a non-trivial change, add a blank line and a short bullet-point body with what and why.\n\
         4. Reply with the commit message only.\n\n\
         Old code:\n```\n{old_code}\n```\n\n\
         New code:\n```\n{new_code}\n```\n"
    )
}
