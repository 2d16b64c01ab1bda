use crate::{
    manager::{SegmentManager, SegmentManagerCommand},
    io::json::SegmentMap,
    types::ExtractedNetwork,
};
use base64::Engine;
use rmcp::{
    handler::server::tool::IntoCallToolResult, model::{CallToolResult, Content, ServerCapabilities, ServerInfo}, schemars, tool, Error as McpError, ServerHandler
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use std::sync::{Arc, RwLock};

/// Request for loading an image from a file path
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadImageRequest {
    #[schemars(description = "Path to the image file")]
    pub path: String,
}

/// Request for loading an image from base64 data
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadImageBase64Request {
    #[schemars(description = "Base64-encoded image file contents (PNG, JPEG or TIFF)")]
    pub data: String,
}

/// Request for extraction with an explicit sampling stride
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EpsilonRequest {
    #[schemars(
        description = "Sampling stride along each segment in pixels",
        range(min = 1, max = 500)
    )]
    pub epsilon: usize,
}

/// Response containing segment extraction results
#[derive(Debug, Serialize, schemars::JsonSchema, TS)]
#[ts(export)]
pub struct SegmentsResponse {
    #[schemars(description = "Number of segments extracted")]
    pub segment_count: usize,
    #[schemars(description = "Original image dimensions")]
    pub image_dimensions: ImageDimensions,
    #[schemars(description = "Segment map: z1, z2, ... -> [x1, y1, ..., xn, yn, avg_width]")]
    pub segments: serde_json::Value,
}

#[derive(Debug, Serialize, schemars::JsonSchema, TS)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// MCP Server for segment network extraction
#[derive(Clone)]
pub struct SegmentMcpServer {
    manager: Arc<RwLock<Option<SegmentManager>>>,
}

impl SegmentMcpServer {
    pub fn new() -> Self {
        Self { manager: Arc::new(RwLock::new(None)) }
    }

    fn store(&self, manager: SegmentManager) -> Result<(), String> {
        let mut slot = self.manager.write().map_err(|_| "manager lock poisoned".to_string())?;
        *slot = Some(manager);
        Ok(())
    }

    fn run(&self, command: SegmentManagerCommand) -> Result<ExtractedNetwork, String> {
        let manager_ref = self.manager.read().map_err(|_| "manager lock poisoned".to_string())?;
        let manager = manager_ref.as_ref()
            .ok_or_else(|| "No image loaded. Please load an image first.".to_string())?;
        manager.execute(command).map_err(|e| format!("Segment extraction failed: {}", e))
    }

    /// Convert an ExtractedNetwork to a SegmentsResponse
    fn result_to_response(&self, result: ExtractedNetwork) -> Result<SegmentsResponse, String> {
        let segments = serde_json::to_value(SegmentMap::from_network(&result))
            .map_err(|e| format!("Failed to serialize segments: {}", e))?;

        Ok(SegmentsResponse {
            segment_count: result.intervals.len(),
            image_dimensions: ImageDimensions {
                width: result.image_width,
                height: result.image_height,
            },
            segments,
        })
    }

    fn respond(&self, command: SegmentManagerCommand) -> SegmentsResponse {
        match self.run(command).and_then(|result| self.result_to_response(result)) {
            Ok(response) => response,
            Err(e) => SegmentsResponse::error(e),
        }
    }
}

impl Default for SegmentMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoCallToolResult for SegmentsResponse {
    fn into_call_tool_result(self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&self).unwrap_or_else(|_| format!("{:?}", self)),
        )]))
    }
}

impl SegmentsResponse {
    fn error(message: String) -> Self {
        Self {
            segment_count: 0,
            image_dimensions: ImageDimensions { width: 0, height: 0 },
            segments: serde_json::json!({ "error": message }),
        }
    }
}

#[tool(tool_box)]
impl SegmentMcpServer {
    #[tool(description = "Load an image (dark line structures on a light background) from a file path")]
    fn load_image(&self, #[tool(aggr)] LoadImageRequest { path }: LoadImageRequest) -> String {
        let mut manager = SegmentManager::new();
        if let Err(e) = manager.load_image(&path) {
            return format!("Failed to load image from {}: {}", path, e);
        }
        match self.store(manager) {
            Ok(()) => format!("Image loaded successfully from {}", path),
            Err(e) => e,
        }
    }

    #[tool(description = "Load an image from base64-encoded file contents")]
    fn load_image_base64(&self, #[tool(aggr)] LoadImageBase64Request { data }: LoadImageBase64Request) -> String {
        let bytes = match base64::engine::general_purpose::STANDARD.decode(data.trim()) {
            Ok(bytes) => bytes,
            Err(e) => return format!("Invalid base64 data: {}", e),
        };
        let mut manager = SegmentManager::new();
        if let Err(e) = manager.load_image_from_bytes(&bytes) {
            return format!("Failed to decode image: {}", e);
        }
        match self.store(manager) {
            Ok(()) => format!("Image loaded successfully ({} bytes)", bytes.len()),
            Err(e) => e,
        }
    }

    #[tool(description = "Extract the segment network (z1..zN with sampled points and average width)")]
    fn extract_segments(&self) -> SegmentsResponse {
        self.respond(SegmentManagerCommand::ExtractSegments)
    }

    #[tool(description = "Extract the segment network with an explicit sampling stride")]
    fn extract_segments_with_epsilon(
        &self,
        #[tool(aggr)] EpsilonRequest { epsilon }: EpsilonRequest
    ) -> SegmentsResponse {
        self.respond(SegmentManagerCommand::ExtractSegmentsWithEpsilon { epsilon })
    }

    #[tool(description = "Extract the segment network as a GeoJSON FeatureCollection of LineStrings")]
    fn extract_geojson(&self) -> String {
        match self.run(SegmentManagerCommand::ExtractSegments) {
            Ok(result) => result.to_geojson_string()
                .unwrap_or_else(|e| format!("Failed to build GeoJSON: {}", e)),
            Err(e) => e,
        }
    }

    #[tool(description = "Get information about available commands and their parameters")]
    fn get_command_info(&self) -> String {
        let mut info = String::new();
        info.push_str("Available SegmentManagerCommands:\n\n");

        for (i, name) in SegmentManagerCommand::command_names().iter().enumerate() {
            info.push_str(&format!("{}. {}\n", i + 1, name));
        }

        info.push_str("\nCommand Details:\n");
        let commands = vec![
            SegmentManagerCommand::ExtractSegments,
            SegmentManagerCommand::ExtractSegmentsWithEpsilon { epsilon: 15 },
        ];

        for cmd in commands {
            info.push_str(&format!("\n- {}\n", cmd));
            info.push_str(&format!("  Description: {}\n", cmd.description()));

            let params = cmd.parameters_info();
            if !params.is_empty() {
                info.push_str("  Parameters:\n");
                for (name, desc, required) in params {
                    let req_marker = if required { " (required)" } else { " (optional)" };
                    info.push_str(&format!("    - {}{}: {}\n", name, req_marker, desc));
                }
            }
        }

        info
    }

    #[tool(description = "Get the JSON schema for SegmentManagerCommand")]
    fn get_command_schema(&self) -> String {
        let schema = SegmentManagerCommand::schema();
        serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|e| format!("Failed to serialize schema: {}", e))
    }
}

#[tool(tool_box)]
impl ServerHandler for SegmentMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Road Network Extraction Server - Skeletonize dark line structures in an image, split them at junctions, and report sampled segments with local widths.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_before_load_reports_error() {
        let server = SegmentMcpServer::new();
        let response = server.respond(SegmentManagerCommand::ExtractSegments);
        assert_eq!(response.segment_count, 0);
        assert!(response.segments.get("error").is_some());
    }

    #[test]
    fn test_bad_base64_is_reported() {
        let server = SegmentMcpServer::new();
        let message = server.load_image_base64(LoadImageBase64Request { data: "%%%".to_string() });
        assert!(message.starts_with("Invalid base64 data"));
    }
}
