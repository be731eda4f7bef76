// All LLM prompt constants for the tailoring module.
// Placeholders in `{braces}` are filled with `str::replace` before sending.

/// Keyword extraction. Replace `{job_description}`.
pub const KEYWORDS_PROMPT_TEMPLATE: &str = r#"Identify the 15-20 most important technical keywords, hard skills, tools and certifications in the job description below.
Prefer concrete technologies ("React", "AWS Lambda", "Terraform") over generic terms.

Return ONLY a JSON array of strings, for example: ["Python", "FastAPI", "AWS", "Docker"]

Job description:
{job_description}"#;

pub const REWRITE_SYSTEM: &str = "You are a resume optimizer that edits RenderCV YAML documents. \
    You return a single YAML document and nothing else.";

/// Résumé rewrite. Replace `{keywords}`, `{job_description}`, `{current_yaml}`,
/// `{banned_words}`, `{region_instructions}` and `{custom_instructions}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below so it scores highly in an ATS for the job description, while reading as if a person wrote it.

KEYWORDS TO WORK IN: {keywords}

JOB DESCRIPTION:
{job_description}

CURRENT RESUME (RenderCV YAML):
{current_yaml}

RULES:
1. Write like an engineer talking to another engineer. Vary sentence length and structure; do not start consecutive bullets the same way; sometimes lead with the result.
2. Never use these words: {banned_words}. Prefer plain verbs such as "led", "built", "ran", "fixed", "used".
3. Do not invent job titles, companies, dates, locations or new experience entries. Only improve the bullet points of existing roles. Keep date formats.
4. Keep the `basics` block. `name`, `email`, `phone`, `website`, `location` and `social_networks` must be present in the output.
5. Work the keywords in naturally where the experience supports them. Quantify results where realistic.
6. Plain text only: no bold, no italics, no markdown.

{region_instructions}

{custom_instructions}

OUTPUT: return ONLY the YAML document, starting with `cv:`."#;

/// User-supplied instructions block. Replace `{user_comments}`.
pub const CUSTOM_INSTRUCTIONS_TEMPLATE: &str = r#"USER INSTRUCTIONS (highest priority, except the no-invention rule):
"{user_comments}""#;

/// ATS scoring. Replace `{resume_yaml}` and `{job_description}`.
pub const ATS_PROMPT_TEMPLATE: &str = r#"Act as an applicant tracking system. Score RESUME_YAML against JOB_DESCRIPTION.

Consider keyword coverage (skills, titles, qualifications), logical structure (assume the layout renders correctly), quantified results and readability.
Benchmarks: 90-100 excellent, 80-89 good, 70-79 fair, below 70 weak.

Return a JSON object:
{
  "score": 0,
  "feedback": "strengths and weaknesses",
  "missing_keywords": ["keyword"],
  "formatting_check": "comment on structure and content quality"
}

RESUME_YAML:
{resume_yaml}

JOB_DESCRIPTION:
{job_description}"#;

/// AI-pattern detection. Replace `{resume_yaml}` and `{banned_words}`.
pub const DETECT_AI_PROMPT_TEMPLATE: &str = r#"Review the resume below for phrasing that reads as machine-generated: cliches, buzzwords and robotic rhythm.
Typical giveaways: {banned_words}.

RESUME:
{resume_yaml}

Give a human score from 0 to 100 (100 = clearly written by a person), list flagged phrases with a more natural alternative, and summarise.

Return a JSON object:
{
  "human_score": 85,
  "items": [
    {"phrase": "spearheaded the development", "suggestion": "led the development", "reason": "Overused buzzword"}
  ],
  "summary": "one or two sentences"
}"#;

/// Cover letter. Replace `{resume_yaml}` and `{job_description}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for the candidate below, addressed to the role in the job description.

RESUME:
{resume_yaml}

JOB DESCRIPTION:
{job_description}

Rules:
- At most 300 words, professional and warm.
- No placeholders such as "[Company Name]": infer names from the job description or address the "Hiring Team".
- Highlight two concrete achievements from the resume that match the role.
- Separate paragraphs with a blank line.

Return a JSON object: {"cover_letter_text": "Dear Hiring Team, ..."}"#;

/// Three-step cold email sequence. Replace `{job_description}` and `{resume_excerpt}`.
pub const COLD_EMAIL_PROMPT_TEMPLATE: &str = r#"Write a three-step cold email sequence for this job application.

JOB DESCRIPTION:
{job_description}

RESUME SUMMARY:
{resume_excerpt}

Return ONLY a JSON object:
{
  "emails": [
    {"label": "Initial Email", "subject": "Specific subject line", "body": "At most 200 words"},
    {"label": "Follow-up (3 Days)", "subject": "Re: original subject", "body": "Short, polite nudge"},
    {"label": "Final Follow-up (7 Days)", "subject": "Re: original subject", "body": "Brief closing note"}
  ]
}"#;

/// Single outreach message. Replace `{task}`, `{label}`, `{job_description}`
/// and `{resume_excerpt}`.
pub const SINGLE_MESSAGE_PROMPT_TEMPLATE: &str = r#"Task: {task}

JOB DESCRIPTION:
{job_description}

RESUME SUMMARY:
{resume_excerpt}

Return ONLY a JSON object:
{
  "emails": [
    {"label": "{label}", "subject": "Outreach", "body": "message text"}
  ]
}"#;

pub const LINKEDIN_TASK: &str = "Draft a short, professional LinkedIn connection request \
    (at most 300 characters) that highlights one strong match. No subject line.";

pub const FOLLOW_UP_TASK: &str =
    "Draft a polite but firm follow-up email sent one week after applying. Restate enthusiasm.";

/// LinkedIn note to a recruiter. Replace `{kind}`, `{resume_excerpt}`,
/// `{recruiter_name}`, `{recruiter_role}`, `{company}`, `{job_excerpt}` and `{constraints}`.
pub const LINKEDIN_PROMPT_TEMPLATE: &str = r#"Write a {kind} to a recruiter or hiring manager.

MY RESUME (YAML excerpt):
{resume_excerpt}

RECIPIENT:
Name: {recruiter_name}
Role: {recruiter_role}
Company: {company}

CONTEXT / JOB:
{job_excerpt}

CONSTRAINTS:
{constraints}

Goal: get a reply or an accepted connection by naming one specific skill from my resume that fits their team.
Return ONLY the message text, without quotes."#;

pub const CONNECTION_KIND: &str = "LinkedIn connection request (strictly under 300 characters)";
pub const CONNECTION_CONSTRAINTS: &str = "Under 300 characters including spaces. \
    Casual but professional. Mention a shared interest or a relevant skill.";
pub const MESSAGE_KIND: &str = "LinkedIn InMail message";
pub const MESSAGE_CONSTRAINTS: &str =
    "Professional and concise, about 100-150 words. Open with a hook.";
