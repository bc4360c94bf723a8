use std::{io,fs};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::naive::NaiveDate;
use serde::Serialize;
use serde_json::{Value,json};

use super::date::iso;
use super::error::Result;
use super::stats::StatsRecord;


const SERIES: [(&str, &str); 4] = [
    ("Infected", "#d62728"),
    ("Cured", "#2ca02c"),
    ("Deaths", "#7f7f7f"),
    ("Active", "#ff7f0e"),
];


fn series_values(data: &[StatsRecord]) -> Vec<Value> {
    data.iter().flat_map(|r| {
	let counts = [r.record.infected_count as i64, r.record.cured_count as i64,
		      r.record.death_count as i64, r.active_count];
	SERIES.iter().zip(counts).map(move |((name,_), value)| json!({
	    "Date": iso(&r.record.date),
	    "Series": name,
	    "Value": value
	}))
    }).collect()
}


/// Writes the trend of one area as a standalone vega-lite page, with a
/// rule marking the needle.
pub fn trend_graph(graph_path: &Path, name: &str, title: &str,
		   needle: NaiveDate, data: &[StatsRecord]) -> Result<()> {

    fs::create_dir_all(graph_path)?;
    let mut out = io::BufWriter::new(File::create(graph_path.join(format!("{}.html", name)))?);

    write!(out, "<!DOCTYPE html><html><head>")?;
    write!(out, "<meta charset=\"UTF-8\">")?;
    write!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
    write!(out, "<title>{}</title>", title)?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega@5\"></script>")?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega-lite@4\"></script>")?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega-embed\"></script>")?;
    write!(out, "</head>")?;
    write!(out, "<body>")?;
    write!(out, "<div id=\"vis\" style=\"overflow: hidden; position: absolute;top: 0; left: 0; right: 0; bottom: 0;\"></div>")?;
    write!(out, "<script type=\"text/javascript\">")?;
    write!(out, "var spec = ")?;

    serde_json::to_writer_pretty(out.by_ref(), &trend_spec(title, needle, data))?;

    write!(out, ";vegaEmbed('#vis', spec,{{}}).then(function(result) {{")?;
    write!(out, "}}).catch(console.error);")?;
    write!(out, "</script>")?;
    write!(out, "</body></html>")?;

    Ok(())

}


fn trend_spec(title: &str, needle: NaiveDate, data: &[StatsRecord]) -> Value {
    json!({
	"$schema": "https://vega.github.io/schema/vega-lite/v4.json",
	"height": "container",
	"width": "container",
	"title": title,
	"layer": [
	    {
		"data": { "values": series_values(data) },
		"encoding": {
		    "color": {
			"field": "Series",
			"type": "nominal",
			"scale": {
			    "domain": SERIES.iter().map(|(name,_)| *name).collect::<Vec<_>>(),
			    "range": SERIES.iter().map(|(_,color)| *color).collect::<Vec<_>>()
			}
		    },
		    "x": {
			"field": "Date",
			"timeUnit": "utcyearmonthdate",
			"title": "Date",
			"type": "temporal"
		    },
		    "y": {
			"field": "Value",
			"title": "Count",
			"type": "quantitative"
		    }
		},
		"layer": [
		    {
			"mark": "line",
			"selection": {
			    "Highlight": {"bind":"legend","type":"multi","fields":["Series"]}
			},
			"encoding": {
			    "opacity": {"value":0.1,"condition":{"value":1,"selection":"Highlight"}}
			}
		    },
		    {
			"mark": {"type": "point", "tooltip": {"content": "data"}},
			"encoding": {
			    "opacity": {"value":0,"condition":{"value":1,"selection":"Highlight"}}
			}
		    }
		]
	    },
	    {
		"data": { "values": [{ "Date": iso(&needle) }] },
		"mark": {
		    "color": "black",
		    "opacity": 0.5,
		    "size": 1,
		    "type": "rule"
		},
		"encoding": {
		    "x": {
			"field": "Date",
			"timeUnit": "utcyearmonthdate",
			"type": "temporal"
		    }
		}
	    }
	]
    })
}


#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapSnapshot<'a> {
    date: NaiveDate,
    max_active_count: i64,
    records: &'a [StatsRecord],
}

/// Writes the needle-day records that color the map, with the maximum
/// active count that calibrates the color scale.
pub fn map_snapshot(graph_path: &Path, name: &str, needle: NaiveDate,
		    max_active_count: i64, data: &[StatsRecord]) -> Result<()> {
    fs::create_dir_all(graph_path)?;
    let out = io::BufWriter::new(File::create(graph_path.join(format!("{}.json", name)))?);
    serde_json::to_writer_pretty(out, &MapSnapshot { date: needle, max_active_count, records: data })?;
    Ok(())
}
