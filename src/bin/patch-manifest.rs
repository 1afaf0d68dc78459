use hap_distribution::config;
use hap_distribution::logger;
use hap_distribution::manifest;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;
    logger::init(&cfg);

    let report = manifest::run(&cfg.manifest)?;

    logger::log_manifest_patched(
        &cfg.manifest.source_path,
        &cfg.manifest.copy_path,
        &report.urls.deploy_domain,
    );
    logger::log_manifest_links(&report.urls.package, &report.urls.manifest, &report.deep_link);
    Ok(())
}
