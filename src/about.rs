pub const TITLE: &str = "Gemini AI Explorer";

pub const INSTRUCTIONS: &str = "\
Usage
  - Use Gemini Pro to talk to an advanced language model with plain text.
  - Explore Gemini Pro Vision by supplying an image together with a prompt.
  - Switch between the Gemini Pro and Gemini Pro Vision modes to try
    different kinds of input and models.";

pub const ABOUT: &str = "\
About
  - Gemini AI Explorer lets you explore what the Gemini Pro and
    Gemini Pro Vision models can do.
  - Set GOOGLE_API_KEY (or put it in a .env file) before sending prompts.

Developed by Diego Fernández (https://www.linkedin.com/in/diego-fernandez-728a35206/)";

pub const GROUP: &str = "\
Development group
  Built in the ARISE group (Artificial Intelligence Research in Statistics
  and Economics) at the Banco Central del Uruguay.";

/// Full sidebar text: title, usage instructions, about and credits.
pub fn sidebar() -> String {
    format!("{TITLE}\n\n{INSTRUCTIONS}\n\n{ABOUT}\n\n{GROUP}\n")
}
