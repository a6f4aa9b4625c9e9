use super::layout::PageLayout;
use super::xml_escape;
use crate::types::ImageGenerator;

/// SVG drawing of a greeked page. The source text is kept in `<desc>`.
pub fn render_page(page: &PageLayout, generator: ImageGenerator, text: &str) -> Vec<u8> {
    let mut out = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = page.width,
        h = page.height
    );
    out.push_str(&format!("  <desc>{}</desc>\n", xml_escape(text)));
    out.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

    let style = match generator {
        ImageGenerator::Greeked => "fill=\"#282830\"",
        ImageGenerator::Outline => "fill=\"none\" stroke=\"#282830\" stroke-width=\"1\"",
    };
    out.push_str(&format!("  <g {}>\n", style));
    for b in &page.boxes {
        out.push_str(&format!(
            "    <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"/>\n",
            b.x, b.y, b.width, b.height
        ));
    }
    out.push_str("  </g>\n</svg>\n");
    out.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::layout::layout;

    #[test]
    fn test_svg_has_one_rect_per_word() {
        let page = layout("one two three", 300);
        let svg = String::from_utf8(render_page(&page, ImageGenerator::Greeked, "one two three")).unwrap();
        assert!(svg.contains("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        // background plus one per word
        assert_eq!(svg.matches("<rect ").count(), 4);
        assert!(svg.contains("<desc>one two three</desc>"));
    }

    #[test]
    fn test_outline_uses_stroke() {
        let page = layout("a < b", 300);
        let svg = String::from_utf8(render_page(&page, ImageGenerator::Outline, "a < b")).unwrap();
        assert!(svg.contains("stroke=\"#282830\""));
        assert!(svg.contains("<desc>a &lt; b</desc>"));
    }
}
