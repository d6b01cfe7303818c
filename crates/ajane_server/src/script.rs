//! The polling client embedded in every page.
//!
//! The client posts `revision=<baseline>` plus any changed fields to the
//! page URL once per poll interval, applies the returned diff and takes the
//! returned revision as its next baseline. Text input is debounced in the
//! client; the server always applies whatever arrives.

use crate::config::ServerConfig;
use ajane_protocol::{write_filtered, Revision};
use std::fmt::{self, Write};

const CLIENT: &str = r#"
ajane.pending = {};
ajane.timers = {};
ajane.failures = 0;
ajane.inflight = false;
ajane.indicate = function(ok) {
  var els = document.getElementsByClassName('ajane-indicator');
  for (var i = 0; i < els.length; i++) {
    els[i].innerHTML = els[i].getAttribute(ok ? 'data-ok' : 'data-fail');
  }
};
ajane.failed = function() {
  ajane.failures++;
  if (ajane.failures >= ajane.threshold) ajane.indicate(false);
};
ajane.apply = function(diff) {
  for (var id in diff) {
    if (id === 'ArduJAXrevision') continue;
    var el = document.getElementById(id);
    if (!el) continue;
    var props = diff[id];
    for (var name in props) {
      var v = props[name];
      if (name === 'style.display') el.style.display = v;
      else if (name === 'disabled') el.disabled = (v !== '');
      else if (name === 'checked') el.checked = (v === 'true');
      else el[name] = v;
    }
  }
  ajane.revision = diff.ArduJAXrevision;
};
ajane.request = function() {
  if (ajane.inflight) { ajane.failed(); return; }
  var body = 'revision=' + ajane.revision;
  for (var id in ajane.pending) {
    body += '&' + encodeURIComponent(id) + '=' + encodeURIComponent(ajane.pending[id]);
  }
  ajane.pending = {};
  ajane.inflight = true;
  var xhr = new XMLHttpRequest();
  xhr.open('POST', ajane.url, true);
  xhr.setRequestHeader('Content-Type', 'application/x-www-form-urlencoded');
  xhr.timeout = ajane.interval * ajane.threshold;
  xhr.onload = function() {
    ajane.inflight = false;
    if (xhr.status !== 200) { ajane.failed(); return; }
    if (ajane.failures >= ajane.threshold) ajane.indicate(true);
    ajane.failures = 0;
    ajane.apply(JSON.parse(xhr.responseText));
  };
  xhr.onerror = xhr.ontimeout = function() {
    ajane.inflight = false;
    ajane.failed();
  };
  xhr.send(body);
};
ajane.send = function(id, value) {
  ajane.pending[id] = value;
  if (!ajane.inflight) ajane.request();
};
ajane.debounced = function(id, value) {
  clearTimeout(ajane.timers[id]);
  ajane.timers[id] = setTimeout(function() { ajane.send(id, value); }, ajane.debounce);
};
setInterval(ajane.request, ajane.interval);
"#;

/// Writes the client script, seeded with the page's revision and the
/// client-side settings of `config`.
pub fn write_client_script<W: Write + ?Sized>(
    out: &mut W,
    revision: Revision,
    config: &ServerConfig,
) -> fmt::Result {
    write!(out, "var ajane = {{revision: {}, url: ", revision)?;
    write_filtered(out, &config.path, true, false)?;
    write!(
        out,
        ", interval: {}, debounce: {}, threshold: {}}};",
        config.poll_interval.as_millis(),
        config.input_debounce.as_millis(),
        config.connection_failure_threshold.max(1)
    )?;
    out.write_str(CLIENT)
}
