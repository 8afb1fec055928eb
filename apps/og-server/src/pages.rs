//! HTML pages served by the interactive preview endpoint

const PAGE_STYLES: &str = r#"
body {
    margin: 0;
    padding: 0;
    display: flex;
    justify-content: center;
    align-items: center;
    height: 100vh;
    background-color: #f0f0f0;
}
img {
    display: block;
    width: 100%;
    height: auto;
    max-width: 800px;
}
"#;

/// Page showing a rendered preview inline
pub fn preview_page(title: &str, data_uri: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{PAGE_STYLES}</style>
</head>
<body>
    <img src="{src}" alt="{alt}">
</body>
</html>"#,
        title = html_escape::encode_text(title),
        src = html_escape::encode_double_quoted_attribute(data_uri),
        alt = html_escape::encode_double_quoted_attribute(title),
    )
}

/// Generic failure page; never carries error details
pub fn error_page() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head><title>Error</title></head>
<body>
    <h1>Error generating image</h1>
    <p>Something went wrong while generating your image. Please try again later.</p>
</body>
</html>"#
        .to_string()
}
