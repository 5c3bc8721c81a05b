//! Prompt text for each task. Pure string building, no I/O.

/// Marker the resume analysis asks the model to use for an empty category.
pub const NONE_IDENTIFIED: &str = "None identified";

/// Section headings the skill gap analysis asks for, in order.
pub const SKILL_GAP_SECTIONS: [&str; 5] = [
    "SKILL REQUIREMENTS ANALYSIS",
    "CANDIDATE SKILL ASSESSMENT",
    "GAP ANALYSIS",
    "CRITICAL GAPS",
    "RECOMMENDATIONS",
];

pub fn summarize(text: &str) -> String {
    format!("Please summarize the following text:\n\n{text}")
}

pub fn sentiment(text: &str) -> String {
    format!("Analyze the sentiment of the following text:\n\n{text}")
}

pub fn ideas(topic: &str, num_ideas: usize) -> String {
    format!("Generate {num_ideas} creative ideas about: {topic}")
}

pub fn resume_skills(resume_text: &str) -> String {
    format!(
        "Please analyze the following resume text and extract three categories of skills:\n\
         1. Technical Skills: Hard skills related to specific technologies, tools, or technical knowledge\n\
         2. Functional Skills: Job-specific abilities and domain knowledge\n\
         3. Soft Skills: Interpersonal and behavioral traits\n\
         \n\
         For each category, provide a comma-separated list of identified skills.\n\
         If a category has no identifiable skills, mark it as \"{NONE_IDENTIFIED}\".\n\
         \n\
         Resume text:\n\
         {resume_text}\n\
         \n\
         Please format the response as follows:\n\
         Technical Skills: [list of skills]\n\
         Functional Skills: [list of skills]\n\
         Soft Skills: [list of skills]\n"
    )
}

pub fn skill_gap(resume_text: &str, job_description: &str) -> String {
    let [requirements, assessment, gaps, critical, recommendations] = SKILL_GAP_SECTIONS;
    format!(
        "Perform a detailed skill gap analysis between the candidate's resume and the job description.\n\
         Follow these specific analytical steps:\n\
         \n\
         1. Skill Extraction and Quantification:\n\
         \x20  - From Job Description: List required skills with their relative importance (Scale 1-5)\n\
         \x20  - From Resume: List candidate's skills with their apparent proficiency level (Scale 1-5)\n\
         \x20  Base these ratings on:\n\
         \x20  - Years of experience\n\
         \x20  - Project complexity described\n\
         \x20  - Leadership/ownership level\n\
         \x20  - Specific achievements mentioned\n\
         \n\
         2. Gap Analysis:\n\
         \x20  - Calculate match scores for each skill area\n\
         \x20  - Identify missing critical skills (importance >= 4)\n\
         \x20  - Note areas where candidate exceeds requirements\n\
         \n\
         3. Recommendations:\n\
         \x20  - Prioritize skill gaps by:\n\
         \x20    * Importance to role (1-5)\n\
         \x20    * Estimated time to acquire\n\
         \x20    * Impact on job performance\n\
         \x20  - Suggest specific learning paths or certifications\n\
         \n\
         Format the response as follows:\n\
         \n\
         {requirements}\n\
         [List skills from JD with importance ratings]\n\
         \n\
         {assessment}\n\
         [List candidate's skills with proficiency ratings]\n\
         \n\
         {gaps}\n\
         [Quantified gaps and matches]\n\
         \n\
         {critical}\n\
         [List of high-priority missing skills]\n\
         \n\
         {recommendations}\n\
         [Prioritized action items]\n\
         \n\
         Resume text:\n\
         {resume_text}\n\
         \n\
         Job Description:\n\
         {job_description}\n"
    )
}

/// Input summary logged alongside skill gap records.
pub fn skill_gap_log_input(resume_text: &str, job_description: &str) -> String {
    format!("Resume: {resume_text}\nJD: {job_description}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_templates_embed_input() {
        assert_eq!(summarize("abc"), "Please summarize the following text:\n\nabc");
        assert_eq!(sentiment("great"), "Analyze the sentiment of the following text:\n\ngreat");
        assert_eq!(ideas("solar power", 5), "Generate 5 creative ideas about: solar power");
    }

    #[test]
    fn resume_template_lists_categories_and_fallback() {
        let p = resume_skills("Led a team of 5 developers.");
        assert!(p.contains("Led a team of 5 developers."));
        for heading in ["Technical Skills:", "Functional Skills:", "Soft Skills:"] {
            assert!(p.contains(heading), "{heading}");
        }
        assert!(p.contains("\"None identified\""));
        // continuation lines must not carry source indentation
        assert!(!p.contains("\n "));
    }

    #[test]
    fn skill_gap_template_keeps_inputs_verbatim_and_sections_ordered() {
        let resume = "  Jane Roe\n\tSpark, Kafka - 5 yrs\n";
        let jd = "Data Engineer: SQL, Python, AWS {braces} 100%";
        let p = skill_gap(resume, jd);
        assert!(p.contains(resume));
        assert!(p.contains(jd));

        let positions: Vec<_> = SKILL_GAP_SECTIONS.iter().map(|s| p.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(p.contains("(Scale 1-5)"));
        assert!(p.contains("   - Years of experience"));
    }

    #[test]
    fn log_input_format() {
        assert_eq!(skill_gap_log_input("r", "j"), "Resume: r\nJD: j");
    }
}
