use siteaudit::audit::Severity;
use siteaudit::audit::robots::{RobotsIssue, validate_robots};
use siteaudit::config::{AuditConfig, EndpointSpec};
use siteaudit::discovery::network::{
    EndpointCategory, FetchOutcome, Fetcher, HttpFetcher, HttpResponse,
};
use siteaudit::error::Error;
use siteaudit::report::{self, RunReport};
use siteaudit::score::{self, CRAWL_TEST_SCALE, Verdict};
use siteaudit::site::SiteRoot;
use siteaudit::tools::{self, Outcome, crawl, crawl_test, images, performance, seo_qa};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const GOOD_PAGE: &str = r#"import type { Metadata } from "next";

export const metadata: Metadata = {
  title: "Pricing | Clinic",
  description: "Transparent pricing for every visit.",
  alternates: { canonical: "https://www.clinic.test/pricing" },
  openGraph: { title: "Pricing", images: ["/og/pricing.png"] },
};

export default function Page() {
  return <main>Pricing</main>;
}
"#;

const BARE_PAGE: &str = r#"export default function Page() {
  return <main>Blog</main>;
}
"#;

const GALLERY: &str = r#"import Image from "next/image";

export function Gallery() {
  return <Image src="/photo.png" alt="Clinic" width={800} height={600} />;
}
"#;

const ROBOTS: &str = "\
User-agent: *
Allow: /
Disallow: /api/
Disallow: /admin/
Disallow: /portal/
Sitemap: https://www.clinic.test/sitemap.xml
";

const SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://www.clinic.test/</loc></url>
  <url><loc>https://www.clinic.test/pricing</loc></url>
</urlset>
"#;

const BUILT_PAGE: &str = r#"<!DOCTYPE html><html lang="en"><head>
<title>Pricing | Clinic</title>
<meta name="description" content="Transparent pricing">
<link rel="canonical" href="https://www.clinic.test/pricing">
<meta property="og:title" content="Pricing">
</head><body><h1>Pricing</h1></body></html>
"#;

/// Create a mock project: two pages (one bare), a not-found page, an
/// image-bearing component, public assets and a static build.
fn create_site_fixture(root: &Path) {
    fs::create_dir_all(root.join("src/app/pricing")).unwrap();
    fs::create_dir_all(root.join("src/app/(marketing)/blog")).unwrap();
    fs::create_dir_all(root.join("src/app/api/health")).unwrap();
    fs::create_dir_all(root.join("src/components")).unwrap();
    fs::create_dir_all(root.join("public/images")).unwrap();
    fs::create_dir_all(root.join("out/pricing")).unwrap();

    fs::write(root.join("src/app/pricing/page.tsx"), GOOD_PAGE).unwrap();
    fs::write(root.join("src/app/(marketing)/blog/page.tsx"), BARE_PAGE).unwrap();
    fs::write(root.join("src/app/api/health/page.tsx"), BARE_PAGE).unwrap();
    fs::write(
        root.join("src/app/not-found.tsx"),
        "export default function NotFound() { return <h1>Page not found</h1>; }\n",
    )
    .unwrap();
    fs::write(root.join("src/components/Gallery.tsx"), GALLERY).unwrap();
    fs::write(root.join("src/components/Footer.tsx"), "export const Footer = () => null;\n").unwrap();

    fs::write(root.join("public/photo.png"), vec![0u8; 2048]).unwrap();
    fs::write(root.join("public/images/team.jpg"), vec![0u8; 600 * 1024]).unwrap();
    fs::write(root.join("public/images/team.webp"), vec![0u8; 90 * 1024]).unwrap();
    fs::write(root.join("public/robots.txt"), ROBOTS).unwrap();
    fs::write(root.join("public/sitemap.xml"), SITEMAP).unwrap();

    fs::write(root.join("out/index.html"), BUILT_PAGE).unwrap();
    fs::write(root.join("out/pricing/index.html"), BUILT_PAGE).unwrap();

    fs::write(
        root.join("siteaudit.toml"),
        "[site]\nbase_url = \"https://www.clinic.test\"\ndomain = \"clinic.test\"\n",
    )
    .unwrap();
}

fn setup() -> (TempDir, SiteRoot, AuditConfig) {
    let tmp = TempDir::new().unwrap();
    create_site_fixture(tmp.path());
    let site = SiteRoot::new(tmp.path());
    let config = siteaudit::config::load(&site, Some(&tmp.path().join("siteaudit.toml"))).unwrap();
    (tmp, site, config)
}

/// Canned responses keyed by URL; anything else is refused.
#[derive(Default)]
struct CannedFetcher {
    responses: HashMap<String, (u16, String)>,
}

impl CannedFetcher {
    fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(url.to_string(), (status, body.to_string()));
        self
    }
}

impl Fetcher for CannedFetcher {
    fn fetch(&self, url: &str) -> FetchOutcome {
        match self.responses.get(url) {
            Some((status, body)) => FetchOutcome::Response(HttpResponse {
                status: *status,
                headers: BTreeMap::new(),
                body: body.clone(),
            }),
            None => FetchOutcome::Failed {
                error: "connection refused".to_string(),
            },
        }
    }
}

fn live_site() -> CannedFetcher {
    let page = "<html><head><title>Clinic</title></head><body></body></html>";
    CannedFetcher::default()
        .with("https://www.clinic.test/", 200, page)
        .with("https://www.clinic.test/robots.txt", 200, ROBOTS)
        .with("https://www.clinic.test/sitemap.xml", 200, SITEMAP)
        .with("https://www.clinic.test/pricing", 200, page)
        .with("https://www.clinic.test/faq", 200, page)
        .with("https://www.clinic.test/blog", 200, page)
        .with("https://www.clinic.test/locations", 200, page)
        .with("https://www.clinic.test/conditions", 200, page)
}

#[test]
fn test_bare_page_has_exactly_three_critical_findings() {
    let (_tmp, site, config) = setup();
    let run = performance::audit(&site, &config, |_| {}).unwrap();

    let blog: Vec<_> = run
        .details
        .critical
        .iter()
        .filter(|f| f.unit == "src/app/(marketing)/blog/page.tsx")
        .collect();
    assert_eq!(blog.len(), 3);
    assert!(blog.iter().all(|f| f.severity == Severity::Critical));
    assert!(blog.iter().any(|f| f.message.starts_with("/blog:")));
}

#[test]
fn test_excluded_directories_are_not_audited() {
    let (_tmp, site, config) = setup();
    let run = performance::audit(&site, &config, |_| {}).unwrap();
    for bucket in [&run.details.critical, &run.details.warning, &run.details.info] {
        assert!(bucket.iter().all(|f| !f.unit.contains("/api/")));
    }
}

#[test]
fn test_robots_missing_domain_only() {
    let content = "User-agent: *\nSitemap: https://cdn.other.test/a.xml\nSitemap: https://cdn.other.test/b.xml\n";
    let check = validate_robots(Some(content), "clinic.test", &[]);

    assert!(!check.valid);
    assert_eq!(check.sitemap_count, 2);
    assert_eq!(check.issues, vec![RobotsIssue::MissingDomain]);
    assert_eq!(check.findings("robots.txt").len(), 1);
}

#[test]
fn test_seven_of_ten_is_seventy() {
    let score = score::base_score(7, 10);
    assert_eq!(score, 70);
    assert_eq!(CRAWL_TEST_SCALE.verdict(score, 10), Verdict::NeedsWork);
}

#[test]
fn test_unoptimized_image_reference() {
    let (_tmp, site, config) = setup();
    let run = performance::audit(&site, &config, |_| {}).unwrap();

    let gallery: Vec<_> = run
        .details
        .warning
        .iter()
        .filter(|f| f.unit == "src/components/Gallery.tsx")
        .collect();
    assert_eq!(gallery.len(), 1);
    assert_eq!(gallery[0].message, "Image not optimized: photo.png");
}

#[test]
fn test_components_without_images_are_skipped() {
    let (_tmp, site, config) = setup();
    let mut seen = Vec::new();
    performance::audit(&site, &config, |o| seen.push(o.identifier.clone())).unwrap();
    assert!(seen.contains(&"src/components/Gallery.tsx".to_string()));
    assert!(!seen.contains(&"src/components/Footer.tsx".to_string()));
}

#[test]
fn test_performance_run_writes_report_and_fails_on_critical() {
    let (tmp, site, config) = setup();
    let outcome = performance::run(&site, &config, true).unwrap();
    assert_eq!(outcome, Outcome::Fail);
    assert_eq!(outcome.code(), 1);

    let path = tmp.path().join(performance::REPORT_FILE);
    let loaded: RunReport = report::load_json(&path).unwrap();
    assert_eq!(loaded.summary.critical, 3);
    assert!(!tmp.path().join("performance-audit-report.json.tmp").exists());
}

#[test]
fn test_report_keeps_every_finding() {
    let (tmp, site, config) = setup();
    for i in 0..15 {
        let dir = tmp.path().join(format!("src/app/bare{:02}", i));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("page.tsx"), BARE_PAGE).unwrap();
    }
    performance::run(&site, &config, true).unwrap();

    let loaded: RunReport = report::load_json(&tmp.path().join(performance::REPORT_FILE)).unwrap();
    assert_eq!(loaded.details.critical.len(), 16 * 3);
    assert_eq!(loaded.summary.critical, loaded.details.critical.len());
}

#[test]
fn test_repeated_runs_differ_only_in_timestamp() {
    let (tmp, site, config) = setup();
    let path = tmp.path().join(performance::REPORT_FILE);

    performance::run(&site, &config, true).unwrap();
    let mut first: serde_json::Value = report::load_json(&path).unwrap();
    performance::run(&site, &config, true).unwrap();
    let mut second: serde_json::Value = report::load_json(&path).unwrap();

    first["timestamp"] = serde_json::Value::Null;
    second["timestamp"] = serde_json::Value::Null;
    assert_eq!(first, second);
}

#[test]
fn test_unreachable_endpoint_times_out_and_run_completes() {
    // Accepts connections but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let silent = format!("http://{}/", listener.local_addr().unwrap());

    let (_tmp, _site, mut config) = setup();
    config.endpoints = vec![
        EndpointSpec {
            path: silent.clone(),
            category: EndpointCategory::Page,
            critical: true,
        },
        EndpointSpec {
            path: "http://127.0.0.1:1/robots.txt".to_string(),
            category: EndpointCategory::Robots,
            critical: false,
        },
    ];
    let fetcher = HttpFetcher::new("siteaudit-test", Duration::from_secs(1)).unwrap();
    let report = crawl::audit(&config, &fetcher, |_| {});

    assert_eq!(report.endpoints.len(), 2);
    assert!(!report.endpoints[0].success);
    assert_eq!(report.endpoints[0].status, 0);
    assert!(report.alerts.iter().any(|a| a.url == silent && a.critical));
    assert!(!report.passes());
    drop(listener);
}

#[test]
fn test_crawl_healthy_site_writes_dated_report() {
    let (tmp, site, config) = setup();
    let outcome = crawl::run(&site, &config, &live_site(), true).unwrap();
    assert_eq!(outcome, Outcome::Pass);

    let file = crawl::report_file(chrono::Utc::now().date_naive());
    let value: serde_json::Value = report::load_json(&tmp.path().join(file)).unwrap();
    assert_eq!(value["endpoint_health"]["critical"], 100);
    assert_eq!(value["alerts"].as_array().unwrap().len(), 0);
    assert_eq!(value["summary"]["verdict"], "excellent");
}

#[test]
fn test_crawl_test_offline_and_online() {
    let (tmp, site, config) = setup();

    let offline = crawl_test::audit(&site, &config, &CannedFetcher::default(), |_| {});
    assert!(!offline.blend.network_available);
    assert_eq!(offline.run.summary.score, offline.blend.local_score);

    let outcome = crawl_test::run(&site, &config, &live_site(), true).unwrap();
    let loaded: crawl_test::CrawlTestReport =
        report::load_json(&tmp.path().join(crawl_test::REPORT_FILE)).unwrap();
    assert!(loaded.blend.network_available);
    assert_eq!(loaded.blend.remote_score, Some(100));
    // robots, sitemap and pricing pass; the bare blog page fails
    assert_eq!(loaded.blend.local_score, 75);
    assert_eq!(loaded.run.summary.score, 83);
    assert_eq!(outcome, Outcome::Pass);
}

#[test]
fn test_seo_qa_passes_clean_build() {
    let (tmp, site, config) = setup();
    let outcome = seo_qa::run(&site, &config, true).unwrap();
    assert_eq!(outcome, Outcome::Pass);
    assert!(!tmp.path().join("seo-qa-report.json").exists());
}

#[test]
fn test_images_plan() {
    let (tmp, site, config) = setup();
    let plan = images::build(&site, &config).unwrap();
    assert_eq!(plan.total_images, 3);
    assert_eq!(plan.large.len(), 1);
    assert_eq!(plan.missing_webp.len(), 1);
    assert_eq!(plan.missing_webp[0].path, "public/photo.png");

    images::run(&site, &config, true).unwrap();
    let md = fs::read_to_string(tmp.path().join(images::PLAN_FILE)).unwrap();
    assert!(md.contains("cwebp -q 80 'public/photo.png' -o 'public/photo.webp'"));
}

#[test]
fn test_missing_roots_are_fatal() {
    let tmp = TempDir::new().unwrap();
    let site = SiteRoot::new(tmp.path());
    let config = AuditConfig::default();

    assert!(matches!(
        performance::audit(&site, &config, |_| {}),
        Err(Error::MissingRoot { .. })
    ));
    assert!(matches!(
        seo_qa::audit(&site, &config, |_| {}),
        Err(Error::MissingRoot { .. })
    ));
    assert!(matches!(images::build(&site, &config), Err(Error::MissingRoot { .. })));
}

#[test]
fn test_reports_directory_is_configurable() {
    let (tmp, site, mut config) = setup();
    config.paths.reports = "reports/seo".to_string();
    performance::run(&site, &config, true).unwrap();
    assert!(tmp.path().join("reports/seo").join(performance::REPORT_FILE).exists());
    assert_eq!(
        tools::report_path(&config, "x.json"),
        Path::new("reports/seo/x.json")
    );
}
