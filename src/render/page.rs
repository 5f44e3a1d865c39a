use super::format::ProductView;
use crate::models::AnalysisReport;
use std::fmt::Write;

/// 页面状态；Loading 只存在于浏览器端（提交后按钮禁用）
#[derive(Debug, Clone)]
pub enum PageState {
    Idle,
    Success(AnalysisReport),
    Failed { message: String },
}

const STYLE: &str = r#"
body { font-family: sans-serif; background: #1f1f2e; color: #f5f5f5; display: flex; flex-direction: column; align-items: center; padding: 1rem; }
.card { background: #5b21b6; border-radius: 0.5rem; padding: 1rem; min-width: 50%; }
.card input[type=file] { background: #f5f5f5; color: #4b5563; border-radius: 0.75rem; padding: 0.5rem; width: 100%; }
.card button { background: #16a34a; color: #fff; font-weight: bold; border: 0; border-radius: 0.75rem; padding: 0.5rem; width: 100%; margin-top: 0.5rem; }
.card button:disabled { opacity: 0.5; }
#preview { width: 12rem; height: 12rem; object-fit: contain; border-radius: 0.5rem; margin: 0 auto 1rem; display: block; }
.stats { display: flex; justify-content: space-between; font-size: 0.875rem; color: #e5e7eb; margin-top: 0.5rem; }
.alert { background: #b91c1c; border-radius: 0.5rem; padding: 0.5rem; margin-top: 0.5rem; }
.products { width: 100%; display: flex; flex-direction: column; gap: 0.5rem; }
.product { border: 1px solid #fff; border-radius: 0.75rem; text-align: center; padding: 0.5rem; }
.chips { background: #4b5563; display: flex; flex-direction: column; gap: 0.25rem; }
"#;

const SCRIPT: &str = r#"
(function () {
  const form = document.getElementById('analyze-form');
  const input = document.getElementById('image');
  const button = document.getElementById('analyze');
  const preview = document.getElementById('preview');
  const loading = document.getElementById('loading');
  let previewUrl = null;

  function releasePreview() {
    if (previewUrl) {
      URL.revokeObjectURL(previewUrl);
      previewUrl = null;
    }
  }

  input.addEventListener('change', function () {
    releasePreview();
    const file = input.files && input.files[0];
    button.disabled = !file;
    if (file) {
      previewUrl = URL.createObjectURL(file);
      preview.src = previewUrl;
      preview.hidden = false;
    } else {
      preview.hidden = true;
    }
  });

  form.addEventListener('submit', function (event) {
    if (!input.files || !input.files[0]) {
      event.preventDefault();
      alert('Envie uma imagem primeiro.');
      return;
    }
    button.disabled = true;
    button.textContent = 'Analisando...';
    loading.hidden = false;
  });

  window.addEventListener('pagehide', releasePreview);
})();
"#;

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// 嵌入 <script> 的 JS 字符串字面量
fn js_string(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

/// 渲染整页
pub fn render_page(state: &PageState) -> String {
    let mut html = String::new();
    // 写入 String 不会失败
    let _ = write_page(&mut html, state);
    html
}

fn write_page(out: &mut String, state: &PageState) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"pt-BR\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
    writeln!(out, "<title>Analisar produto</title>")?;
    writeln!(out, "<style>{}</style>", STYLE)?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    writeln!(out, "<div class=\"card\">")?;
    writeln!(out, "<h1>Analisar produto</h1>")?;
    writeln!(
        out,
        "<form id=\"analyze-form\" method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">"
    )?;
    writeln!(out, "<img id=\"preview\" alt=\"Preview\" hidden>")?;
    writeln!(out, "<input id=\"image\" type=\"file\" name=\"image\" accept=\"image/*\">")?;
    writeln!(out, "<button id=\"analyze\" type=\"submit\" disabled>Analisar</button>")?;
    writeln!(out, "</form>")?;
    writeln!(out, "<p id=\"loading\" hidden>Analisando...</p>")?;

    match state {
        PageState::Idle => {}
        PageState::Success(report) => {
            writeln!(out, "<div class=\"stats\">")?;
            writeln!(
                out,
                "<p>Tempo de análise: {} segundos</p>",
                format!("{:.2}", report.elapsed_ms as f64 / 1000.0).replace('.', ",")
            )?;
            writeln!(out, "<p>Quantidade de produtos: {}</p>", report.products.len())?;
            writeln!(out, "</div>")?;
        }
        PageState::Failed { message } => {
            writeln!(out, "<div class=\"alert\" role=\"alert\">{}</div>", escape_html(message))?;
            writeln!(out, "<script>window.alert({});</script>", js_string(message))?;
        }
    }
    writeln!(out, "</div>")?;

    if let PageState::Success(report) = state {
        if !report.products.is_empty() {
            writeln!(out, "<section class=\"products\">")?;
            writeln!(out, "<h2>Produtos:</h2>")?;
            for product in &report.products {
                write_product(out, &ProductView::from(product))?;
            }
            writeln!(out, "</section>")?;
        }
    }

    writeln!(out, "<script>{}</script>", SCRIPT)?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

fn write_product(out: &mut String, view: &ProductView) -> std::fmt::Result {
    writeln!(out, "<article class=\"product\">")?;
    writeln!(out, "<h3>{}</h3>", escape_html(&view.name))?;
    writeln!(out, "<p>Descrição: {}</p>", escape_html(&view.description))?;
    writeln!(out, "<p class=\"price\">{}</p>", escape_html(&view.price))?;
    writeln!(out, "<p>Referência: {}</p>", escape_html(&view.reference))?;
    writeln!(out, "<p>NCM: {}</p>", escape_html(&view.ncm))?;

    writeln!(out, "<p>Tags:</p>")?;
    writeln!(out, "<div class=\"chips\">")?;
    for tag in &view.tags {
        writeln!(out, "<span class=\"tag\">{}</span>", escape_html(tag))?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, "<p>Variações:</p>")?;
    writeln!(out, "<div class=\"chips\">")?;
    for variation in &view.variations {
        writeln!(out, "<span class=\"variation\">{}</span>", escape_html(variation))?;
    }
    writeln!(out, "</div>")?;

    writeln!(out, "<p>Unidade: {}</p>", escape_html(&view.unit))?;
    for (label, value) in &view.tax_fields {
        writeln!(out, "<p>{}: {}</p>", label, escape_html(value))?;
    }
    writeln!(out, "</article>")
}
