/// WGSL for the image planes.
///
/// The vertex stage blends each vertex between its resting place (the model
/// matrix over the image box) and a full-viewport state. The blend weight is
/// the corner vector interpolated bilinearly across the plane, plus a ripple
/// that peaks mid-progress. The fragment stage cover-fits the texture to the
/// interpolated on-screen size.
pub const PLANE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    resolution: vec2<f32>,
    time: f32,
    progress: f32,
    corners: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var plane_texture: texture_2d<f32>;
@group(1) @binding(1)
var plane_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    // xy = quad size, zw = texture size
    @location(6) sizes: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) size: vec2<f32>,
    @location(2) texture_size: vec2<f32>,
};

const PI: f32 = 3.1415926;

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    let sine = sin(PI * globals.progress);
    let waves = sine * 0.1 * sin(5.0 * length(vertex.uv) + 15.0 * globals.progress);

    let default_state = model * vec4<f32>(vertex.position, 1.0);
    let full_screen_state = vec4<f32>(
        vertex.position.x * globals.resolution.x,
        vertex.position.y * globals.resolution.y,
        vertex.position.z + globals.corners.x,
        1.0,
    );

    let c = globals.corners;
    let corners_progress = mix(
        mix(c.z, c.w, vertex.uv.x),
        mix(c.x, c.y, vertex.uv.x),
        vertex.uv.y,
    );

    let final_state = mix(default_state, full_screen_state, corners_progress + waves);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * final_state;
    out.uv = vertex.uv;
    out.size = mix(instance.sizes.xy, globals.resolution, corners_progress);
    out.texture_size = instance.sizes.zw;
    return out;
}

fn cover_uv(uv: vec2<f32>, texture_size: vec2<f32>, quad_size: vec2<f32>) -> vec2<f32> {
    var centered = uv - vec2<f32>(0.5);
    let quad_aspect = quad_size.x / quad_size.y;
    let texture_aspect = texture_size.x / texture_size.y;
    if quad_aspect < texture_aspect {
        centered = centered * vec2<f32>(quad_aspect / texture_aspect, 1.0);
    } else {
        centered = centered * vec2<f32>(1.0, texture_aspect / quad_aspect);
    }
    return centered + vec2<f32>(0.5);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = cover_uv(in.uv, in.texture_size, in.size);
    // Texture rows run top to bottom; plane uv.y runs bottom to top.
    return textureSample(plane_texture, plane_sampler, vec2<f32>(uv.x, 1.0 - uv.y));
}
"#;
