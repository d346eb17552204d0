// All LLM instruction templates for the analysis pipeline.
// Placeholders in `{braces}` are replaced before sending; the JSON schema
// braces are literal.

/// Step 1. Replace `{job_description}`.
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and extract key information that will be used for resume optimization.

Job Description:
{job_description}

Extract the following:

1. required_skills: explicitly required technical skills, tools, and technologies (must-have qualifications)
2. preferred_skills: preferred but not required skills and qualifications (nice-to-have)
3. key_responsibilities: 5-7 core job duties and responsibilities
4. ats_keywords: 15-20 critical keywords an ATS would scan for (include both spelled-out terms AND acronyms, e.g. "Red Hat Enterprise Linux (RHEL)")

Return a JSON object with this EXACT schema:
{
  "required_skills": ["skill1", "skill2"],
  "preferred_skills": ["skill1", "skill2"],
  "key_responsibilities": ["responsibility1", "responsibility2"],
  "ats_keywords": ["keyword1", "keyword2"]
}

{json_only}"#;

/// Step 2. Replace `{resume_text}`, `{job_analysis}`.
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Compare the candidate's resume against the job requirements and provide a comprehensive gap analysis.

Resume:
{resume_text}

Job Analysis:
{job_analysis}

Provide:

1. match_score: overall match score from 0-100 based on:
   - Technical skills alignment (40 points)
   - Experience level match (20 points)
   - Education/certifications (15 points)
   - Industry/domain relevance (15 points)
   - Keyword density (10 points)
2. strengths: 5-7 specific areas where the candidate is a strong match (include examples from the resume)
3. gaps: the top 5 missing keywords or skills, each with:
   - keyword: the missing keyword
   - priority: "critical", "high", or "medium"
   - suggestion: where/how to add it to the resume
4. keyword_matches: object mapping each ATS keyword to true (present in resume) or false (missing)

Return a JSON object with this EXACT schema:
{
  "match_score": 85,
  "strengths": ["strength1", "strength2"],
  "gaps": [
    {"keyword": "Python", "priority": "critical", "suggestion": "Add to Skills section"}
  ],
  "keyword_matches": {
    "keyword1": true,
    "keyword2": false
  }
}

{json_only}"#;

/// Step 3. Replace `{resume_text}`.
pub const ATS_SCAN_PROMPT_TEMPLATE: &str = r#"Analyze the following resume for ATS (Applicant Tracking System) compatibility and parsing issues.

Resume:
{resume_text}

Provide:

1. ats_score: overall ATS-friendliness score from 0-100
2. issues: categorized issues:
   - formatting: formatting problems (tables, graphics, unusual fonts, headers/footers, text boxes)
   - content: content issues (missing sections, unclear dates, vague descriptions, acronyms not spelled out)
   - keywords: keyword issues (lack of industry keywords, missing technical terms)
3. section_readability: each of contact, summary, experience, education, skills, certifications
   rated "excellent", "good", "needs_improvement", or "missing"
4. recommendations: the top 3-5 specific recommendations to improve ATS compatibility

Return a JSON object with this EXACT schema:
{
  "ats_score": 75,
  "issues": {
    "formatting": ["issue1"],
    "content": ["issue1"],
    "keywords": ["issue1"]
  },
  "section_readability": {
    "contact": "good",
    "summary": "needs_improvement",
    "experience": "excellent",
    "education": "good",
    "skills": "needs_improvement",
    "certifications": "missing"
  },
  "recommendations": ["recommendation1", "recommendation2"]
}

{json_only}"#;

/// Step 4. Replace `{resume_text}`, `{job_analysis}`, `{gap_analysis}`, `{ats_scan}`.
/// The answer is plain resume text, not JSON.
pub const OPTIMIZATION_PROMPT_TEMPLATE: &str = r#"Rewrite the following resume so it is optimized for the job and ATS-friendly.

ORIGINAL RESUME:
{resume_text}

JOB ANALYSIS:
{job_analysis}

GAP ANALYSIS:
{gap_analysis}

ATS SCAN RESULTS:
{ats_scan}

HARD RULES:
1. NEVER fabricate experience, skills, or qualifications the candidate doesn't have
2. ONLY reframe and optimize existing experience to highlight relevant aspects
3. If a critical skill is completely missing, note it as a gap; don't invent it
4. Maintain truthfulness while maximizing keyword alignment
5. Preserve the candidate's authentic career narrative

FORMATTING:

Contact:
- Name on line 1
- Contact info on line 2 separated by " | ": Phone | Email | LinkedIn | Location
- No parenthetical notes like "(Open to Relocation)"

Professional Summary:
- 3-4 sentences maximum, front-loaded with job title and years of experience
- Include 4-6 critical keywords from the job description

Experience:
- X-Y-Z bullets: "Accomplished [X] as measured by [Y], by doing [Z]"; short form under 25 words
- 4-6 bullets per role
- Naturally integrate missing keywords from the gap analysis
- Spell out acronyms on first use: "Site Reliability Engineering (SRE)"
- Quantify achievements with percentages, dollars, time saved, or scale

Skills:
- Clear categories with colons, no duplicate categories, no nested colons
- Consistent spelling; include both acronyms and full terms where applicable

Education:
- Separate from Certifications
- Degree name on line 1; School | Location | Date on line 2

Certifications:
- Vertical bulleted list with dates if available, most relevant first

General:
- Standard section headings in CAPS, each followed by its content
- Standard bullet points (•) or hyphens (-)
- Consistent date format (Month YYYY)
- No tables, graphics, images, headers, or footers

Return the optimized resume text directly: no JSON, no code fences, no commentary."#;
