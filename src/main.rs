use color_eyre::Result;
use prompt_kit::{Config, LogFields, PromptError, PromptManager, logging};

const SAMPLE_RESUME_POINT: &str = "Led a team of 4 engineers migrating a legacy PHP billing service \
to Rust, introducing GitHub Actions pipelines and containerized deployments. Cut p99 latency by 35% \
and ran fortnightly design reviews while mentoring two interns.";

const SAMPLE_RESUME: &str = "Alex Kim\n\
Backend engineer with 6 years of experience building event-driven systems.\n\
Comfortable with Kafka, PostgreSQL and Python; shipped a streaming ingestion layer handling 50k msgs/sec.\n\
Owned on-call rotation and incident reviews for a payments team.";

const SAMPLE_JOB_DESCRIPTION: &str = "Senior Data Engineer\n\
Design and maintain scalable batch and streaming pipelines. Build ETL jobs, tune storage layouts \
and partner with analysts on data quality.\n\
Required: SQL, Python, Apache Spark, Airflow. Nice to have: AWS or GCP, dbt.\n\
You thrive in a fast-moving environment and communicate clearly with non-engineers.";

fn main() -> Result<()> {
    color_eyre::install()?;

    // Load .env (optional). This allows reading OPENAI_API_KEY from a local .env file.
    // If the file doesn't exist, ignore the error.
    let _ = dotenvy::dotenv();

    // APIキーが無ければここで終了する
    let config = Config::from_env()?;

    // _guard はdropするとJSON配列が閉じられるため、main終了まで保持
    let (logger, _guard) = logging::init(config.logging())?;
    // 依存クレートの tracing イベントも同じ出力先へ
    tracing::dispatcher::set_global_default(logger.dispatch().clone())?;

    let manager = PromptManager::from_config(&config, &logger)?;

    if let Err(e) = run(&manager) {
        logger.critical("Demo run aborted", LogFields::response(e.to_string()));
        println!("An error occurred: {e}");
    }
    Ok(())
}

fn run(manager: &PromptManager) -> Result<(), PromptError> {
    let skills = manager.analyze_resume_point(SAMPLE_RESUME_POINT)?;
    println!("\nSkills Analysis:");
    println!("{skills}");

    let gap = manager.analyze_skill_gap(SAMPLE_RESUME, SAMPLE_JOB_DESCRIPTION)?;
    println!("\nSkill Gap Analysis:");
    println!("{gap}");
    Ok(())
}
