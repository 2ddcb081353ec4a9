use anyhow::Result;
use owo_colors::OwoColorize;
use whenext_core::CalendarCategory;
use whenext_core::config::WhenextConfig;
use whenext_core::links::{CalendarLinks, LinkGenerator, LinkOptions};

pub fn run(
    config: &WhenextConfig,
    category: Option<&str>,
    tags: Vec<String>,
    days: Option<i64>,
    timezone: Option<String>,
) -> Result<()> {
    let links = config.link_generator();
    let options = LinkOptions {
        tags,
        days,
        timezone,
    };

    match category {
        Some(name) => {
            let category: CalendarCategory = name.parse()?;
            print_links(&links, category, &links.links(category.as_str(), &options));
        }
        None => {
            for (i, (category, category_links)) in
                links.all_category_links(&options).into_iter().enumerate()
            {
                if i > 0 {
                    println!();
                }
                print_links(&links, category, &category_links);
            }
        }
    }

    Ok(())
}

fn print_links(generator: &LinkGenerator, category: CalendarCategory, links: &CalendarLinks) {
    println!("{}", category.display_name().bold());
    println!("  Subscribe:  {}", links.webcal_url);
    println!("  Download:   {}", links.https_url);
    println!(
        "  Share:      {}",
        generator.shareable_url(category.as_str()).dimmed()
    );
    println!(
        "  QR code:    {}",
        generator.qr_code_url(category.as_str()).dimmed()
    );
}
